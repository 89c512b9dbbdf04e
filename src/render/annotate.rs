// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! 帧标注: 轨迹框 + ID标签 + 计数线
//! Draw track boxes, their ID labels and the counting line onto an RGBA frame

use ab_glyph::{FontRef, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::warn;

use crate::tracking::{CrossingLine, Track, TrackStatus};

pub const MATCHED_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]); // 绿色: 已匹配
pub const NEW_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]); // 蓝色: 新建
pub const LINE_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]); // 黄色: 计数线

/// 线宽 (像素)
const THICKNESS: i32 = 2;

/// 标签字号和与框顶的距离 (文字基线在框顶上方 LABEL_GAP 像素)
const LABEL_SIZE: f32 = 14.0;
const LABEL_GAP: i32 = 10;

const FONT_DATA: &[u8] = include_bytes!("../../assets/font/DejaVuSans.ttf");

fn label_font() -> Option<FontRef<'static>> {
    match FontRef::try_from_slice(FONT_DATA) {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("⚠️ 标签字体加载失败, 不绘制ID: {}", e);
            None
        }
    }
}

pub fn track_color(track: &Track) -> Rgba<u8> {
    match track.status {
        TrackStatus::Matched => MATCHED_COLOR,
        TrackStatus::New => NEW_COLOR,
    }
}

pub fn track_label(track: &Track) -> String {
    format!("ID:{}", track.id)
}

/// 绘制所有轨迹框, ID标签和计数线
pub fn annotate(image: &mut RgbaImage, tracks: &[Track], line: CrossingLine) {
    let font = label_font();
    for track in tracks {
        draw_box(image, track);
        if let Some(font) = &font {
            draw_label(image, track, font);
        }
    }
    draw_counting_line(image, line);
}

fn draw_box(image: &mut RgbaImage, track: &Track) {
    let color = track_color(track);
    let b = track.bbox;

    // 先裁剪到画面外一圈, 之后的尺寸都能放进 u32/i32
    let margin = THICKNESS as i64;
    let (max_x, max_y) = (image.width() as i64 + margin, image.height() as i64 + margin);
    let x1 = (b.x1 as i64).clamp(-margin, max_x);
    let x2 = (b.x2 as i64).clamp(-margin, max_x);
    let y1 = (b.y1 as i64).clamp(-margin, max_y);
    let y2 = (b.y2 as i64).clamp(-margin, max_y);

    for inset in 0..THICKNESS as i64 {
        let w = x2 - x1 - 2 * inset;
        let h = y2 - y1 - 2 * inset;
        if w <= 0 || h <= 0 {
            break;
        }
        let rect =
            Rect::at((x1 + inset) as i32, (y1 + inset) as i32).of_size(w as u32, h as u32);
        draw_hollow_rect_mut(image, rect, color);
    }
}

fn draw_label(image: &mut RgbaImage, track: &Track, font: &FontRef<'_>) {
    let label = track_label(track);
    let size = LABEL_SIZE as i64;
    let x = track.bbox.x1 as i64;
    let y = track.bbox.y1 as i64 - LABEL_GAP as i64 - size;

    // 完全在画面外的标签不画
    let max_width = label.len() as i64 * size;
    let outside_x = x >= image.width() as i64 || x + max_width < 0;
    let outside_y = y >= image.height() as i64 || y + size < 0;
    if outside_x || outside_y {
        return;
    }
    draw_text_mut(
        image,
        track_color(track),
        x as i32,
        y as i32,
        PxScale::from(LABEL_SIZE),
        font,
        &label,
    );
}

fn draw_counting_line(image: &mut RgbaImage, line: CrossingLine) {
    let right = image.width() as f32;
    for offset in 0..THICKNESS {
        let y = (line.y + offset) as f32;
        draw_line_segment_mut(image, (0.0, y), (right, y), LINE_COLOR);
    }
}
