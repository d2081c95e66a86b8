//! Win32 backend: restyles a real HWND.
//!
//! The attached window's procedure is subclassed so drop, display-change and
//! style notifications reach the registered callbacks. Only one window can be
//! hooked per process.

use std::ffi::c_void;
use std::mem;

use once_cell::sync::Lazy;
use std::sync::Mutex;
use tracing::{debug, warn};
use windows::Win32::Foundation::{
    GetLastError, SetLastError, BOOL, COLORREF, HWND, LPARAM, LRESULT, POINT, RECT, WIN32_ERROR,
    WPARAM,
};
use windows::Win32::Graphics::Dwm::DwmExtendFrameIntoClientArea;
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, MonitorFromWindow, HDC, HMONITOR, MONITORINFOEXW,
    MONITOR_DEFAULTTONEAREST,
};
use windows::Win32::System::Threading::GetCurrentProcessId;
use windows::Win32::UI::Controls::MARGINS;
use windows::Win32::UI::Input::KeyboardAndMouse::GetActiveWindow;
use windows::Win32::UI::Shell::{DragAcceptFiles, DragFinish, DragQueryFileW, HDROP};
use windows::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, DefWindowProcW, EnumWindows, GetAncestor, GetClientRect, GetCursorPos,
    GetForegroundWindow, GetLayeredWindowAttributes, GetWindow, GetWindowLongPtrW,
    GetWindowRect, GetWindowThreadProcessId, IsWindow, IsWindowVisible, IsZoomed, SetCursorPos,
    SetLayeredWindowAttributes, SetWindowLongPtrW, SetWindowPos, ShowWindow, GA_ROOTOWNER,
    GWLP_WNDPROC, GWL_EXSTYLE, GWL_STYLE, GW_OWNER, HWND_BOTTOM, HWND_NOTOPMOST, HWND_TOPMOST,
    LAYERED_WINDOW_ATTRIBUTES_FLAGS, LWA_ALPHA, LWA_COLORKEY, SET_WINDOW_POS_FLAGS,
    SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOOWNERZORDER, SWP_NOSIZE, SWP_NOZORDER,
    SW_MAXIMIZE, SW_RESTORE, WINDOW_LONG_PTR_INDEX, WM_DISPLAYCHANGE, WM_DROPFILES, WM_SIZE,
    WM_STYLECHANGED, WNDPROC, WS_CAPTION, WS_EX_LAYERED, WS_EX_TOPMOST, WS_EX_TRANSPARENT,
    WS_MAXIMIZEBOX, WS_MINIMIZEBOX, WS_SYSMENU, WS_THICKFRAME,
};

use crate::error::{Result, WindowError};
use crate::native::{
    DropCallback, IntCallback, LayeredAttributes, MonitorRect, NativeWindow, Rgb8,
    TransparentMode, WindowHandle, WindowSelector,
};
use crate::path_list;
use crate::state::WindowStateEvent;

const FRAME_STYLE: u32 =
    WS_CAPTION.0 | WS_THICKFRAME.0 | WS_SYSMENU.0 | WS_MINIMIZEBOX.0 | WS_MAXIMIZEBOX.0;

struct Hook {
    hwnd: isize,
    previous: isize,
    drop: Option<DropCallback>,
    monitor: Option<IntCallback>,
    style: Option<IntCallback>,
}

static HOOK: Lazy<Mutex<Option<Hook>>> = Lazy::new(|| Mutex::new(None));

fn hwnd_of(handle: WindowHandle) -> HWND {
    HWND(handle as *mut c_void)
}

pub struct Win32Window {
    hwnd: Option<HWND>,
    /// `GWL_STYLE` before the frame was removed.
    framed_style: Option<isize>,
    host_layered: bool,
    transparent: bool,
    bottommost: bool,
    alpha: f32,
    mode: TransparentMode,
    key_color: Rgb8,
}

impl Default for Win32Window {
    fn default() -> Self {
        Self::new()
    }
}

impl Win32Window {
    pub fn new() -> Self {
        Self {
            hwnd: None,
            framed_style: None,
            host_layered: false,
            transparent: false,
            bottommost: false,
            alpha: 1.0,
            mode: TransparentMode::Alpha,
            key_color: Rgb8::default(),
        }
    }

    fn target(&self) -> Result<HWND> {
        self.hwnd.ok_or(WindowError::Detached)
    }

    fn long(&self, index: WINDOW_LONG_PTR_INDEX) -> isize {
        match self.hwnd {
            Some(hwnd) => unsafe { GetWindowLongPtrW(hwnd, index) },
            None => 0,
        }
    }

    fn set_long(
        &self,
        call: &'static str,
        index: WINDOW_LONG_PTR_INDEX,
        value: isize,
    ) -> Result<isize> {
        let hwnd = self.target()?;
        unsafe {
            SetLastError(WIN32_ERROR(0));
            let previous = SetWindowLongPtrW(hwnd, index, value);
            if previous == 0 {
                let code = GetLastError();
                if code.0 != 0 {
                    return Err(WindowError::native(call, code.0));
                }
            }
            Ok(previous)
        }
    }

    fn reposition(
        &self,
        call: &'static str,
        insert_after: HWND,
        x: i32,
        y: i32,
        cx: i32,
        cy: i32,
        flags: SET_WINDOW_POS_FLAGS,
    ) -> Result<()> {
        let hwnd = self.target()?;
        unsafe { SetWindowPos(hwnd, insert_after, x, y, cx, cy, flags) }
            .map_err(|err| WindowError::win32(call, err))
    }

    fn restack(&self, call: &'static str, insert_after: HWND) -> Result<()> {
        self.reposition(
            call,
            insert_after,
            0,
            0,
            0,
            0,
            SWP_NOMOVE | SWP_NOSIZE | SWP_NOACTIVATE | SWP_NOOWNERZORDER,
        )
    }

    fn window_rect(&self) -> Result<RECT> {
        let hwnd = self.target()?;
        let mut rect = RECT::default();
        unsafe { GetWindowRect(hwnd, &mut rect) }
            .map_err(|err| WindowError::win32("GetWindowRect", err))?;
        Ok(rect)
    }

    /// Re-derive `WS_EX_LAYERED` and its attributes from the current state.
    fn refresh_layered(&self) -> Result<()> {
        let hwnd = self.target()?;
        let ex_style = self.long(GWL_EXSTYLE) as u32;
        let attributes = LayeredAttributes::select(
            self.transparent,
            self.mode,
            self.key_color,
            self.alpha,
            ex_style & WS_EX_TRANSPARENT.0 != 0,
        );

        match attributes {
            Some(attributes) => {
                if ex_style & WS_EX_LAYERED.0 == 0 {
                    self.set_long(
                        "SetWindowLongPtrW",
                        GWL_EXSTYLE,
                        (ex_style | WS_EX_LAYERED.0) as isize,
                    )?;
                }
                unsafe {
                    SetLayeredWindowAttributes(
                        hwnd,
                        COLORREF(attributes.key),
                        attributes.alpha,
                        LAYERED_WINDOW_ATTRIBUTES_FLAGS(attributes.flags),
                    )
                }
                .map_err(|err| WindowError::win32("SetLayeredWindowAttributes", err))
            }
            None if !self.host_layered && ex_style & WS_EX_LAYERED.0 != 0 => self
                .set_long(
                    "SetWindowLongPtrW",
                    GWL_EXSTYLE,
                    (ex_style & !WS_EX_LAYERED.0) as isize,
                )
                .map(|_| ()),
            None => Ok(()),
        }
    }

    fn extend_frame(&self, enabled: bool) -> Result<()> {
        let hwnd = self.target()?;
        let inset = if enabled { -1 } else { 0 };
        let margins = MARGINS {
            cxLeftWidth: inset,
            cxRightWidth: inset,
            cyTopHeight: inset,
            cyBottomHeight: inset,
        };
        unsafe { DwmExtendFrameIntoClientArea(hwnd, &margins) }
            .map_err(|err| WindowError::win32("DwmExtendFrameIntoClientArea", err))
    }

    fn emit_style(&self, event: WindowStateEvent) {
        let callback = HOOK
            .lock()
            .ok()
            .and_then(|hook| hook.as_ref().and_then(|hook| hook.style));
        if let Some(callback) = callback {
            callback(event.bits() as i32);
        }
    }

    /// Read the layered attributes the window already carries.
    fn adopt_layered(&mut self, hwnd: HWND) {
        let ex_style = self.long(GWL_EXSTYLE) as u32;
        self.host_layered = ex_style & WS_EX_LAYERED.0 != 0;
        if !self.host_layered {
            return;
        }
        let mut key = COLORREF(0);
        let mut alpha = 255u8;
        let mut flags = LAYERED_WINDOW_ATTRIBUTES_FLAGS(0);
        let read = unsafe {
            GetLayeredWindowAttributes(
                hwnd,
                Some(&mut key as *mut _),
                Some(&mut alpha as *mut _),
                Some(&mut flags as *mut _),
            )
        };
        if read.is_ok() {
            if flags.0 & LWA_ALPHA.0 != 0 {
                self.alpha = alpha as f32 / 255.0;
            }
            if flags.0 & LWA_COLORKEY.0 != 0 {
                self.key_color = Rgb8::from_colorref(key.0);
                self.mode = TransparentMode::ColorKey;
                self.transparent = true;
            }
        }
    }

    fn with_hook(&mut self, f: impl FnOnce(&mut Hook)) -> bool {
        let Some(hwnd) = self.hwnd else {
            return false;
        };
        match HOOK.lock() {
            Ok(mut guard) => match guard.as_mut() {
                Some(hook) if hook.hwnd == hwnd.0 as isize => {
                    f(hook);
                    true
                }
                _ => false,
            },
            Err(_) => false,
        }
    }
}

impl NativeWindow for Win32Window {
    fn attach(&mut self, selector: WindowSelector) -> Result<WindowHandle> {
        if self.hwnd.is_some() {
            self.detach();
        }
        let hwnd = find_window(selector).ok_or(WindowError::NotFound { selector })?;

        *self = Self::new();
        self.hwnd = Some(hwnd);
        self.adopt_layered(hwnd);

        // The hook must be in place before the first message reaches it.
        let previous = unsafe { GetWindowLongPtrW(hwnd, GWLP_WNDPROC) };
        if let Ok(mut guard) = HOOK.lock() {
            *guard = Some(Hook {
                hwnd: hwnd.0 as isize,
                previous,
                drop: None,
                monitor: None,
                style: None,
            });
        }
        if previous == 0
            || unsafe { SetWindowLongPtrW(hwnd, GWLP_WNDPROC, hook_wndproc as isize) } == 0
        {
            if let Ok(mut guard) = HOOK.lock() {
                *guard = None;
            }
            warn!(
                handle = hwnd.0 as isize,
                "could not subclass window; notifications unavailable"
            );
        }
        unsafe { DragAcceptFiles(hwnd, true) };

        debug!(handle = hwnd.0 as isize, "win32 window attached");
        Ok(hwnd.0 as isize)
    }

    fn detach(&mut self) {
        let Some(hwnd) = self.hwnd.take() else {
            return;
        };
        let hook = HOOK.lock().ok().and_then(|mut guard| guard.take());
        if let Some(hook) = hook {
            if hook.hwnd == hwnd.0 as isize && unsafe { IsWindow(hwnd) }.as_bool() {
                unsafe {
                    SetWindowLongPtrW(hwnd, GWLP_WNDPROC, hook.previous);
                }
            }
        }
        debug!(handle = hwnd.0 as isize, "win32 window detached");
    }

    fn is_active(&self) -> bool {
        self.hwnd
            .is_some_and(|hwnd| unsafe { IsWindow(hwnd) }.as_bool())
    }

    fn per_frame_tick(&mut self) {
        // Other windows keep getting raised above us; push back down.
        if self.bottommost {
            if let Err(err) = self.restack("SetWindowPos", HWND_BOTTOM) {
                debug!(%err, "could not keep window at the bottom");
            }
        }
    }

    fn is_transparent(&self) -> bool {
        self.transparent
    }

    fn is_borderless(&self) -> bool {
        self.hwnd.is_some() && self.long(GWL_STYLE) as u32 & WS_CAPTION.0 == 0
    }

    fn is_topmost(&self) -> bool {
        self.long(GWL_EXSTYLE) as u32 & WS_EX_TOPMOST.0 != 0
    }

    fn is_bottommost(&self) -> bool {
        self.bottommost
    }

    fn is_click_through(&self) -> bool {
        self.long(GWL_EXSTYLE) as u32 & WS_EX_TRANSPARENT.0 != 0
    }

    fn is_maximized(&self) -> bool {
        self.hwnd
            .is_some_and(|hwnd| unsafe { IsZoomed(hwnd) }.as_bool())
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }

    fn set_transparent(&mut self, enabled: bool) -> Result<()> {
        self.target()?;
        self.extend_frame(enabled && self.mode == TransparentMode::Alpha)?;
        let previous = self.transparent;
        self.transparent = enabled;
        if let Err(err) = self.refresh_layered() {
            self.transparent = previous;
            return Err(err);
        }
        Ok(())
    }

    fn set_borderless(&mut self, enabled: bool) -> Result<()> {
        let style = self.long(GWL_STYLE);
        let next = if enabled {
            if style as u32 & FRAME_STYLE == 0 {
                return Ok(());
            }
            self.framed_style = Some(style);
            ((style as u32) & !FRAME_STYLE) as isize
        } else {
            match self.framed_style.take() {
                Some(framed) => framed,
                None => return Ok(()),
            }
        };
        self.set_long("SetWindowLongPtrW", GWL_STYLE, next)?;
        self.reposition(
            "SetWindowPos",
            HWND::default(),
            0,
            0,
            0,
            0,
            SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
        )
    }

    fn set_alpha(&mut self, alpha: f32) -> Result<()> {
        self.target()?;
        let previous = self.alpha;
        self.alpha = alpha.clamp(0.0, 1.0);
        if let Err(err) = self.refresh_layered() {
            self.alpha = previous;
            return Err(err);
        }
        Ok(())
    }

    fn set_click_through(&mut self, enabled: bool) -> Result<()> {
        let ex_style = self.long(GWL_EXSTYLE) as u32;
        let next = if enabled {
            ex_style | WS_EX_TRANSPARENT.0
        } else {
            ex_style & !WS_EX_TRANSPARENT.0
        };
        if next != ex_style {
            self.set_long("SetWindowLongPtrW", GWL_EXSTYLE, next as isize)?;
        }
        self.refresh_layered()
    }

    fn set_topmost(&mut self, enabled: bool) -> Result<()> {
        let was = self.is_topmost();
        if enabled {
            self.bottommost = false;
        }
        let insert_after = if enabled { HWND_TOPMOST } else { HWND_NOTOPMOST };
        self.restack("SetWindowPos", insert_after)?;
        if was != enabled {
            self.emit_style(if enabled {
                WindowStateEvent::TOPMOST_ENABLED
            } else {
                WindowStateEvent::TOPMOST_DISABLED
            });
        }
        Ok(())
    }

    fn set_bottommost(&mut self, enabled: bool) -> Result<()> {
        self.target()?;
        let was = self.bottommost;
        if enabled {
            if self.is_topmost() {
                self.restack("SetWindowPos", HWND_NOTOPMOST)?;
            }
            self.restack("SetWindowPos", HWND_BOTTOM)?;
        }
        self.bottommost = enabled;
        if was != enabled {
            self.emit_style(if enabled {
                WindowStateEvent::BOTTOMMOST_ENABLED
            } else {
                WindowStateEvent::BOTTOMMOST_DISABLED
            });
        }
        Ok(())
    }

    fn set_maximized(&mut self, enabled: bool) -> Result<()> {
        let hwnd = self.target()?;
        let command = if enabled { SW_MAXIMIZE } else { SW_RESTORE };
        // The return value is the previous visibility, not success.
        let _ = unsafe { ShowWindow(hwnd, command) };
        Ok(())
    }

    fn position(&self) -> Result<(i32, i32)> {
        let rect = self.window_rect()?;
        Ok((rect.left, rect.top))
    }

    fn set_position(&mut self, x: i32, y: i32) -> Result<()> {
        self.reposition(
            "SetWindowPos",
            HWND::default(),
            x,
            y,
            0,
            0,
            SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE,
        )
    }

    fn size(&self) -> Result<(i32, i32)> {
        let rect = self.window_rect()?;
        Ok((rect.right - rect.left, rect.bottom - rect.top))
    }

    fn set_size(&mut self, width: i32, height: i32) -> Result<()> {
        self.reposition(
            "SetWindowPos",
            HWND::default(),
            0,
            0,
            width,
            height,
            SWP_NOMOVE | SWP_NOZORDER | SWP_NOACTIVATE,
        )
    }

    fn client_size(&self) -> Result<(i32, i32)> {
        let hwnd = self.target()?;
        let mut rect = RECT::default();
        unsafe { GetClientRect(hwnd, &mut rect) }
            .map_err(|err| WindowError::win32("GetClientRect", err))?;
        Ok((rect.right - rect.left, rect.bottom - rect.top))
    }

    fn monitor_count(&self) -> usize {
        enumerate_monitors().len()
    }

    fn monitor_rect(&self, index: usize) -> Option<MonitorRect> {
        enumerate_monitors().get(index).copied()
    }

    fn current_monitor(&self) -> Option<usize> {
        let hwnd = self.hwnd?;
        let current = unsafe {
            let monitor = MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST);
            monitor_rect_of(monitor)?
        };
        enumerate_monitors().iter().position(|rect| *rect == current)
    }

    fn cursor_position(&self) -> Option<(i32, i32)> {
        let mut point = POINT::default();
        unsafe {
            if GetCursorPos(&mut point).is_ok() {
                Some((point.x, point.y))
            } else {
                None
            }
        }
    }

    fn set_cursor_position(&mut self, x: i32, y: i32) -> Result<()> {
        unsafe { SetCursorPos(x, y) }.map_err(|err| WindowError::win32("SetCursorPos", err))
    }

    fn register_drop_callback(&mut self, callback: DropCallback) -> bool {
        self.with_hook(|hook| hook.drop = Some(callback))
    }

    fn unregister_drop_callback(&mut self) -> bool {
        self.with_hook(|hook| hook.drop = None)
    }

    fn register_monitor_changed_callback(&mut self, callback: IntCallback) -> bool {
        self.with_hook(|hook| hook.monitor = Some(callback))
    }

    fn unregister_monitor_changed_callback(&mut self) -> bool {
        self.with_hook(|hook| hook.monitor = None)
    }

    fn register_style_changed_callback(&mut self, callback: IntCallback) -> bool {
        self.with_hook(|hook| hook.style = Some(callback))
    }

    fn unregister_style_changed_callback(&mut self) -> bool {
        self.with_hook(|hook| hook.style = None)
    }

    fn transparent_mode(&self) -> TransparentMode {
        self.mode
    }

    fn set_transparent_mode(&mut self, mode: TransparentMode) -> Result<()> {
        self.target()?;
        let previous = self.mode;
        self.mode = mode;
        if self.transparent {
            if let Err(err) = self
                .extend_frame(mode == TransparentMode::Alpha)
                .and_then(|()| self.refresh_layered())
            {
                self.mode = previous;
                return Err(err);
            }
        }
        Ok(())
    }

    fn key_color(&self) -> Rgb8 {
        self.key_color
    }

    fn set_key_color(&mut self, color: Rgb8) -> Result<()> {
        self.target()?;
        let previous = self.key_color;
        self.key_color = color;
        if let Err(err) = self.refresh_layered() {
            self.key_color = previous;
            return Err(err);
        }
        Ok(())
    }
}

impl Drop for Win32Window {
    fn drop(&mut self) {
        self.detach();
    }
}

fn find_window(selector: WindowSelector) -> Option<HWND> {
    let hwnd = match selector {
        WindowSelector::OwnWindow => find_process_window(true),
        WindowSelector::OwnerWindow => find_process_window(false)
            .map(|hwnd| unsafe { GetAncestor(hwnd, GA_ROOTOWNER) })
            .filter(|hwnd| !hwnd.0.is_null()),
        WindowSelector::ActiveWindow => {
            let active = unsafe { GetActiveWindow() };
            if !active.0.is_null() {
                Some(active)
            } else {
                let foreground = unsafe { GetForegroundWindow() };
                (!foreground.0.is_null() && window_pid(foreground) == current_pid())
                    .then_some(foreground)
            }
        }
        WindowSelector::Handle(handle) => Some(hwnd_of(handle)),
    }?;
    unsafe { IsWindow(hwnd) }.as_bool().then_some(hwnd)
}

fn current_pid() -> u32 {
    unsafe { GetCurrentProcessId() }
}

fn window_pid(hwnd: HWND) -> u32 {
    let mut pid = 0u32;
    unsafe {
        let _ = GetWindowThreadProcessId(hwnd, Some(&mut pid));
    }
    pid
}

/// First visible top-level window of this process.
fn find_process_window(unowned_only: bool) -> Option<HWND> {
    struct Ctx {
        pid: u32,
        unowned_only: bool,
        found: Option<HWND>,
    }

    unsafe extern "system" fn enum_cb(hwnd: HWND, lparam: LPARAM) -> BOOL {
        let ctx = &mut *(lparam.0 as *mut Ctx);
        if window_pid(hwnd) != ctx.pid || !IsWindowVisible(hwnd).as_bool() {
            return BOOL(1);
        }
        if ctx.unowned_only && !GetWindow(hwnd, GW_OWNER).unwrap_or_default().0.is_null() {
            return BOOL(1);
        }
        ctx.found = Some(hwnd);
        BOOL(0)
    }

    let mut ctx = Ctx {
        pid: current_pid(),
        unowned_only,
        found: None,
    };
    unsafe {
        let ctx_ptr = &mut ctx as *mut Ctx;
        // Stopping early reports an error; the result is in `ctx`.
        let _ = EnumWindows(Some(enum_cb), LPARAM(ctx_ptr as isize));
    }
    ctx.found
}

unsafe fn monitor_rect_of(monitor: HMONITOR) -> Option<MonitorRect> {
    if monitor.0.is_null() {
        return None;
    }
    let mut info = MONITORINFOEXW::default();
    info.monitorInfo.cbSize = mem::size_of::<MONITORINFOEXW>() as u32;
    if GetMonitorInfoW(monitor, &mut info.monitorInfo as *mut _ as *mut _).as_bool() {
        let rc = info.monitorInfo.rcMonitor;
        Some(MonitorRect {
            x: rc.left,
            y: rc.top,
            width: rc.right - rc.left,
            height: rc.bottom - rc.top,
        })
    } else {
        None
    }
}

fn enumerate_monitors() -> Vec<MonitorRect> {
    unsafe extern "system" fn enum_proc(
        monitor: HMONITOR,
        _hdc: HDC,
        _rect: *mut RECT,
        data: LPARAM,
    ) -> BOOL {
        let monitors = unsafe { &mut *(data.0 as *mut Vec<MonitorRect>) };
        if let Some(rect) = unsafe { monitor_rect_of(monitor) } {
            monitors.push(rect);
        }
        BOOL(1)
    }

    let mut monitors = Vec::new();
    unsafe {
        let _ = EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(enum_proc),
            LPARAM(&mut monitors as *mut Vec<MonitorRect> as isize),
        );
    }
    monitors
}

/// Paths carried by a `WM_DROPFILES` drop handle, in the payload format the
/// drop callback expects.
unsafe fn dropped_paths(hdrop: HDROP) -> String {
    let count = DragQueryFileW(hdrop, u32::MAX, None);
    let mut paths = Vec::with_capacity(count as usize);
    for index in 0..count {
        let len = DragQueryFileW(hdrop, index, None) as usize;
        if len == 0 {
            continue;
        }
        let mut buffer = vec![0u16; len + 1];
        let copied = DragQueryFileW(hdrop, index, Some(&mut buffer)) as usize;
        paths.push(String::from_utf16_lossy(&buffer[..copied.min(len)]));
    }
    path_list::encode(&paths)
}

unsafe extern "system" fn hook_wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let hooked = HOOK.lock().ok().and_then(|guard| {
        guard
            .as_ref()
            .filter(|hook| hook.hwnd == hwnd.0 as isize)
            .map(|hook| (hook.previous, hook.drop, hook.monitor, hook.style))
    });
    let Some((previous, drop, monitor, style)) = hooked else {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    };

    match msg {
        WM_DROPFILES => {
            let hdrop = HDROP(wparam.0 as *mut c_void);
            if let Some(callback) = drop {
                callback(&dropped_paths(hdrop));
            }
            DragFinish(hdrop);
            return LRESULT(0);
        }
        WM_DISPLAYCHANGE => {
            if let Some(callback) = monitor {
                callback(enumerate_monitors().len() as i32);
            }
        }
        WM_STYLECHANGED => {
            if let Some(callback) = style {
                callback(WindowStateEvent::STYLE_CHANGED.bits() as i32);
            }
        }
        WM_SIZE => {
            if let Some(callback) = style {
                callback(WindowStateEvent::RESIZED.bits() as i32);
            }
        }
        _ => {}
    }

    let previous: WNDPROC = mem::transmute::<isize, WNDPROC>(previous);
    CallWindowProcW(previous, hwnd, msg, wparam, lparam)
}
