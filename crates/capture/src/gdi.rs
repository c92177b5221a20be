//! Screen region grab using GDI

use crate::frame::bgra_to_rgba;
use crate::{CaptureError, CaptureResult, Rect, ScreenGrabber};
use image::RgbaImage;
use windows::Win32::Foundation::{BOOL, LPARAM, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{
    BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject,
    EnumDisplayMonitors, GetDC, GetDIBits, GetMonitorInfoW, ReleaseDC, SelectObject,
    BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS, HDC, HMONITOR, MONITORINFO, SRCCOPY,
};

/// Grabber backed by the desktop device context
pub struct GdiGrabber;

unsafe extern "system" fn collect_work_area(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let areas = &mut *(lparam.0 as *mut Vec<Rect>);

    let mut mi = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };
    // rcWork excludes the taskbar
    if GetMonitorInfoW(hmonitor, &mut mi).as_bool() {
        areas.push(Rect::from_edges(
            mi.rcWork.left,
            mi.rcWork.top,
            mi.rcWork.right,
            mi.rcWork.bottom,
        ));
    }
    TRUE
}

impl ScreenGrabber for GdiGrabber {
    fn work_areas(&self) -> CaptureResult<Vec<Rect>> {
        let mut areas: Vec<Rect> = Vec::new();
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(collect_work_area),
                LPARAM(&mut areas as *mut Vec<Rect> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(CaptureError::Backend("EnumDisplayMonitors failed".into()));
        }
        Ok(areas)
    }

    fn grab(&self, region: Rect) -> CaptureResult<RgbaImage> {
        if region.is_empty() {
            return Err(CaptureError::EmptyRegion);
        }

        let width = region.width as i32;
        let height = region.height as i32;

        unsafe {
            let screen_dc = GetDC(None);
            if screen_dc.is_invalid() {
                return Err(CaptureError::Backend("Failed to get screen DC".into()));
            }

            let mem_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, width, height);
            let old_bitmap = SelectObject(mem_dc, bitmap);

            let blit = BitBlt(
                mem_dc,
                0,
                0,
                width,
                height,
                screen_dc,
                region.x,
                region.y,
                SRCCOPY,
            );

            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: -height, // Top-down DIB
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                bmiColors: [Default::default()],
            };

            let mut data = vec![0u8; region.width as usize * region.height as usize * 4];
            let lines = if blit.is_ok() {
                GetDIBits(
                    mem_dc,
                    bitmap,
                    0,
                    height as u32,
                    Some(data.as_mut_ptr() as *mut _),
                    &mut bmi,
                    DIB_RGB_COLORS,
                )
            } else {
                0
            };

            SelectObject(mem_dc, old_bitmap);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            ReleaseDC(None, screen_dc);

            blit?;
            if lines == 0 {
                return Err(CaptureError::Backend("GetDIBits copied no scan lines".into()));
            }

            log::debug!("GDI grabbed {}x{} at ({}, {})", width, height, region.x, region.y);
            bgra_to_rgba(data, region.width, region.height)
        }
    }
}
