//! Overlay Window Shell: the borderless, always-topmost, click-through
//! layered window and its message plumbing.
//!
//! The window never accepts focus or mouse input; it exists purely as a
//! rendering surface. Full-window transparency comes from extending the DWM
//! frame into the whole client area plus a layered-window alpha channel.

use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::{BOOL, COLORREF, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Dwm::DwmExtendFrameIntoClientArea;
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, EnumWindows,
    GetForegroundWindow, GetWindowInfo, GetWindowThreadProcessId, IsIconic, IsWindow,
    PeekMessageW, PostQuitMessage, RegisterClassW, SetLayeredWindowAttributes, SetWindowPos,
    ShowWindow, TranslateMessage, CW_USEDEFAULT, HMENU, HWND_TOPMOST, LWA_ALPHA, MSG, PM_REMOVE,
    SWP_NOACTIVATE, SWP_SHOWWINDOW, SW_SHOWNORMAL, WINDOWINFO, WM_CLOSE, WM_DESTROY, WM_QUIT,
    WNDCLASSW, WS_EX_LAYERED, WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_EX_TRANSPARENT, WS_POPUP,
};

use crate::d2d::D2dSurface;
use crate::error::OverlayError;
use crate::scheduler::{OverlayBackend, PumpEvent};
use crate::surface::DrawSurface;
use crate::tracker::{TargetBounds, WindowId};

const WINDOW_CLASS: PCWSTR = w!("d2d_overlay");

unsafe extern "system" fn wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }
        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

unsafe extern "system" fn enum_self_windows(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let found = &mut *(lparam.0 as *mut Option<isize>);
    let mut pid = 0u32;
    GetWindowThreadProcessId(hwnd, Some(&mut pid));
    if pid == GetCurrentProcessId() {
        *found = Some(hwnd.0 as isize);
        return false.into();
    }
    true.into()
}

fn create_overlay_window() -> Result<HWND, OverlayError> {
    unsafe {
        let hinstance = GetModuleHandleW(None).unwrap_or_default();
        let wc = WNDCLASSW {
            lpfnWndProc: Some(wndproc),
            hInstance: hinstance.into(),
            lpszClassName: WINDOW_CLASS,
            ..Default::default()
        };
        // Re-registration after a previous overlay in the same process fails
        // benignly; CreateWindowExW reports the fatal cases.
        let _ = RegisterClassW(&wc);

        let hwnd = CreateWindowExW(
            WS_EX_LAYERED | WS_EX_TRANSPARENT | WS_EX_TOPMOST | WS_EX_TOOLWINDOW,
            WINDOW_CLASS,
            w!("d2d overlay"),
            WS_POPUP,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            None,
            HMENU::default(),
            hinstance,
            None,
        )
        .map_err(|err| OverlayError::WindowCreation(err.to_string()))?;

        let margins = MARGINS {
            cxLeftWidth: -1,
            cxRightWidth: -1,
            cyTopHeight: -1,
            cyBottomHeight: -1,
        };
        if let Err(err) = DwmExtendFrameIntoClientArea(hwnd, &margins) {
            tracing::debug!(?err, "DwmExtendFrameIntoClientArea failed");
        }
        if let Err(err) = SetLayeredWindowAttributes(hwnd, COLORREF(0), 255, LWA_ALPHA) {
            tracing::debug!(?err, "SetLayeredWindowAttributes failed");
        }
        let _ = ShowWindow(hwnd, SW_SHOWNORMAL);

        Ok(hwnd)
    }
}

pub(crate) struct Win32Backend {
    hwnd: HWND,
    surface: D2dSurface,
}

impl Win32Backend {
    /// Create the overlay window and its Direct2D surface. Must run on the
    /// render thread; the window has thread affinity.
    pub(crate) fn create() -> Result<Self, OverlayError> {
        let hwnd = create_overlay_window()?;
        let surface = match D2dSurface::new(hwnd) {
            Ok(surface) => surface,
            Err(err) => {
                unsafe {
                    let _ = DestroyWindow(hwnd);
                }
                return Err(err);
            }
        };
        tracing::debug!(hwnd = hwnd.0 as isize, "overlay window created");
        Ok(Self { hwnd, surface })
    }
}

impl OverlayBackend for Win32Backend {
    fn poll_message(&mut self) -> PumpEvent {
        let mut msg = MSG::default();
        unsafe {
            if PeekMessageW(&mut msg, self.hwnd, 0, 0, PM_REMOVE).as_bool() {
                let _ = TranslateMessage(&msg);
                DispatchMessageW(&msg);
                if msg.message == WM_QUIT {
                    return PumpEvent::Quit;
                }
            }
        }
        PumpEvent::Continue
    }

    fn window_alive(&self) -> bool {
        unsafe { IsWindow(self.hwnd).as_bool() }
    }

    fn discover_self_target(&mut self) -> Option<WindowId> {
        let mut found: Option<isize> = None;
        unsafe {
            // EnumWindows reports an error when the callback stops it early;
            // that is the found case.
            let _ = EnumWindows(
                Some(enum_self_windows),
                LPARAM(&mut found as *mut Option<isize> as isize),
            );
        }
        found.map(WindowId)
    }

    fn target_bounds(&mut self, target: WindowId) -> Option<TargetBounds> {
        let hwnd = HWND(target.0 as *mut core::ffi::c_void);
        unsafe {
            if !IsWindow(hwnd).as_bool() {
                return None;
            }
            let mut info = WINDOWINFO {
                cbSize: std::mem::size_of::<WINDOWINFO>() as u32,
                ..Default::default()
            };
            GetWindowInfo(hwnd, &mut info).ok()?;
            TargetBounds::from_client_rect(
                info.rcClient.left,
                info.rcClient.top,
                info.rcClient.right,
                info.rcClient.bottom,
            )
        }
    }

    fn target_is_foreground(&mut self, target: WindowId) -> bool {
        unsafe { GetForegroundWindow().0 as isize == target.0 }
    }

    fn place_window(&mut self, bounds: TargetBounds) -> bool {
        unsafe {
            if IsIconic(self.hwnd).as_bool() {
                return false;
            }
            if let Err(err) = SetWindowPos(
                self.hwnd,
                HWND_TOPMOST,
                bounds.x,
                bounds.y,
                bounds.width as i32,
                bounds.height as i32,
                SWP_SHOWWINDOW | SWP_NOACTIVATE,
            ) {
                tracing::debug!(?err, "SetWindowPos failed");
                return false;
            }
        }
        true
    }

    fn surface(&mut self) -> &mut dyn DrawSurface {
        &mut self.surface
    }

    fn destroy(&mut self) {
        // Runs on the dedicated render thread that owns the window, after
        // the loop has exited; the thread queue holds only what the
        // destruction posted. Drained without dispatching, up to the
        // WM_QUIT that WM_DESTROY queued.
        unsafe {
            if IsWindow(self.hwnd).as_bool() {
                let _ = DestroyWindow(self.hwnd);
            }
            let mut msg = MSG::default();
            while PeekMessageW(&mut msg, HWND(std::ptr::null_mut()), 0, 0, PM_REMOVE).as_bool() {
                if msg.message == WM_QUIT {
                    break;
                }
            }
        }
        self.hwnd = HWND(std::ptr::null_mut());
    }
}
