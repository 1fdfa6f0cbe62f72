// SPDX-License-Identifier: GPL-3.0-only

//! Terminal presentation of the single screen
//!
//! Toasts and status lines go to stderr, the photo view is drawn with
//! half-block characters (two vertical pixels per cell), and the location
//! dialog is a native message box when a display is available.

use super::{LocationDialog, MessageSender, Presenter};
use crate::app::Message;
use crate::media::downscale::ScaledPhoto;
use crossterm::{
    QueueableCommand,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use image::RgbaImage;
use rfd::{MessageButtons, MessageDialog, MessageLevel};
use std::io::{self, Write};
use tracing::{info, warn};

/// Default number of terminal columns for the photo view
const DEFAULT_COLUMNS: u16 = 64;

/// One terminal cell: upper pixel as foreground, lower pixel as background
pub type HalfBlock = ([u8; 3], [u8; 3]);

/// Presenter that draws into the controlling terminal
pub struct TerminalPresenter {
    native_dialogs: bool,
    columns: u16,
}

impl TerminalPresenter {
    /// `native_dialogs` shows the location dialog as a desktop message box;
    /// otherwise it is printed and dismissed right away.
    pub fn new(native_dialogs: bool) -> Self {
        let columns = crossterm::terminal::size()
            .map(|(cols, _)| cols.saturating_sub(2).max(8))
            .unwrap_or(DEFAULT_COLUMNS);
        Self {
            native_dialogs,
            columns,
        }
    }

    fn draw(&self, cells: &[Vec<HalfBlock>]) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        for row in cells {
            for ([tr, tg, tb], [br, bg, bb]) in row {
                stdout
                    .queue(SetForegroundColor(Color::Rgb {
                        r: *tr,
                        g: *tg,
                        b: *tb,
                    }))?
                    .queue(SetBackgroundColor(Color::Rgb {
                        r: *br,
                        g: *bg,
                        b: *bb,
                    }))?
                    .queue(Print('▀'))?;
            }
            stdout.queue(ResetColor)?.queue(Print("\r\n"))?;
        }
        stdout.flush()
    }
}

impl Presenter for TerminalPresenter {
    fn show_toast(&self, text: &str) {
        info!(text, "Toast");
        eprintln!("» {}", text);
    }

    fn show_dialog(&self, dialog: &LocationDialog, reply: MessageSender) {
        println!("{}\n{}", dialog.title, dialog.message);

        if !self.native_dialogs {
            println!("[{}]", dialog.dismiss_label);
            let _ = reply.send(Message::DialogDismissed);
            return;
        }

        let dialog = dialog.clone();
        tokio::task::spawn_blocking(move || {
            MessageDialog::new()
                .set_level(MessageLevel::Info)
                .set_title(&dialog.title)
                .set_description(&dialog.message)
                .set_buttons(MessageButtons::OkCustom(dialog.dismiss_label.clone()))
                .show();
            let _ = reply.send(Message::DialogDismissed);
        });
    }

    fn display_photo(&self, photo: &ScaledPhoto) {
        let cells = half_blocks(&photo.image, self.columns);
        if let Err(e) = self.draw(&cells) {
            warn!(error = %e, "Failed to draw photo");
        }
        println!(
            "{} ({}x{}, decoded at 1/{} as {}x{})",
            photo.path.display(),
            photo.source_width,
            photo.source_height,
            photo.sample_size,
            photo.width(),
            photo.height()
        );
    }

    fn clear_photo(&self) {
        println!("(no photo)");
    }
}

/// Cell grid size for an image at most `max_columns` wide
///
/// Keeps the aspect ratio, counting two pixel rows per cell.
pub fn grid_size(width: u32, height: u32, max_columns: u16) -> (u32, u32) {
    if width == 0 || height == 0 || max_columns == 0 {
        return (0, 0);
    }
    let columns = width.min(max_columns as u32);
    let pixel_rows = (height as u64 * columns as u64 / width as u64).max(1) as u32;
    (columns, pixel_rows.div_ceil(2))
}

/// Sample `image` into half-block cells
pub fn half_blocks(image: &RgbaImage, max_columns: u16) -> Vec<Vec<HalfBlock>> {
    let (columns, rows) = grid_size(image.width(), image.height(), max_columns);
    if columns == 0 {
        return Vec::new();
    }

    let x_scale = image.width() as f64 / columns as f64;
    let y_scale = image.height() as f64 / (rows * 2) as f64;
    let sample = |x: f64, y: f64| -> [u8; 3] {
        let x = (x as u32).min(image.width() - 1);
        let y = (y as u32).min(image.height() - 1);
        let [r, g, b, _] = image.get_pixel(x, y).0;
        [r, g, b]
    };

    (0..rows)
        .map(|ty| {
            (0..columns)
                .map(|tx| {
                    let x = tx as f64 * x_scale;
                    let top = sample(x, ty as f64 * 2.0 * y_scale);
                    let bottom = sample(x, (ty as f64 * 2.0 + 1.0) * y_scale);
                    (top, bottom)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_grid_size_keeps_aspect() {
        // 400x300 into 40 columns -> 30 pixel rows -> 15 cells
        assert_eq!(grid_size(400, 300, 40), (40, 15));
        // Small image is not enlarged
        assert_eq!(grid_size(10, 4, 80), (10, 2));
        assert_eq!(grid_size(0, 4, 80), (0, 0));
    }

    #[test]
    fn test_half_blocks_split_rows() {
        let image = RgbaImage::from_fn(2, 2, |_, y| {
            if y == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        });
        let cells = half_blocks(&image, 10);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].len(), 2);
        assert_eq!(cells[0][0], ([255, 0, 0], [0, 0, 255]));
    }
}
