//! Sprite loading
//!
//! The art ships at half resolution; everything is decoded once at startup,
//! scaled 2x with nearest-neighbour sampling and sliced into cells. Missing
//! or malformed files are fatal, the caller logs and exits.

use std::error::Error;
use std::path::Path;

use image::RgbaImage;

use crate::render::{Medal, SpriteId};
use crate::sim::{Background, BirdVariant, PipeSkin};

/// One pre-sliced RGBA8 image
#[derive(Debug, Clone)]
pub struct Sprite {
    pub w: u32,
    pub h: u32,
    pub data: Vec<u8>,
}

impl Sprite {
    fn from_image(img: &RgbaImage) -> Self {
        Self {
            w: img.width(),
            h: img.height(),
            data: img.as_raw().clone(),
        }
    }

    fn flipped_vertical(&self) -> Self {
        let row = (self.w * 4) as usize;
        let mut data = Vec::with_capacity(self.data.len());
        for chunk in self.data.chunks_exact(row).rev() {
            data.extend_from_slice(chunk);
        }
        Self {
            w: self.w,
            h: self.h,
            data,
        }
    }
}

/// Every image the game draws, decoded and sliced
pub struct SpriteBank {
    backgrounds: [Sprite; 2],
    birds: [[Sprite; 3]; 3],
    ground: Sprite,
    pipes: [Sprite; 2],
    pipes_flipped: [Sprite; 2],
    big_digits: [Sprite; 10],
    small_digits: [Sprite; 10],
    get_ready: Sprite,
    game_over: Sprite,
    results_panel: Sprite,
    medals: [Sprite; 4],
    play_button: Sprite,
}

impl SpriteBank {
    /// Decode everything under `dir` (the game runs it against
    /// `assets/images/`). Twelve PNGs are required, each at half the final
    /// on-screen resolution:
    ///
    /// | file                   | layout                                     |
    /// |------------------------|--------------------------------------------|
    /// | `background_day.png`   | full backdrop, 144x256                     |
    /// | `background_night.png` | full backdrop, 144x256                     |
    /// | `bird.png`             | 3x3 sheet: one palette per row, 3 wing frames each |
    /// | `ground.png`           | scrolling strip, 168x56                    |
    /// | `pipe.png`             | 2x1 sheet: one column per skin (tops are flipped at load) |
    /// | `big_score_text.png`   | 10x1 sheet: digits 0-9, in-round score     |
    /// | `small_score_text.png` | 10x1 sheet: digits 0-9, results panel      |
    /// | `get_ready.png`        | round-start overlay                        |
    /// | `game_over.png`        | death overlay                              |
    /// | `results_sheet.png`    | results panel                              |
    /// | `medals.png`           | 4x1 sheet: bronze, silver, gold, platinum  |
    /// | `play_button.png`      | restart control                            |
    pub fn load(dir: &Path) -> Result<Self, Box<dyn Error>> {
        let backgrounds = [
            Sprite::from_image(&load_scaled(dir, "background_day.png")?),
            Sprite::from_image(&load_scaled(dir, "background_night.png")?),
        ];

        let mut bird_cells = slice(&load_scaled(dir, "bird.png")?, 3, 3);
        let blue = into_array(bird_cells.split_off(6))?;
        let red = into_array(bird_cells.split_off(3))?;
        let yellow = into_array(bird_cells)?;
        let birds = [yellow, red, blue];

        let ground = Sprite::from_image(&load_scaled(dir, "ground.png")?);

        let pipe_cells = slice(&load_scaled(dir, "pipe.png")?, 2, 1);
        let pipes_flipped = [
            pipe_cells[0].flipped_vertical(),
            pipe_cells[1].flipped_vertical(),
        ];
        let pipes = into_array(pipe_cells)?;

        let big_digits = into_array(slice(&load_scaled(dir, "big_score_text.png")?, 10, 1))?;
        let small_digits = into_array(slice(&load_scaled(dir, "small_score_text.png")?, 10, 1))?;

        let get_ready = Sprite::from_image(&load_scaled(dir, "get_ready.png")?);
        let game_over = Sprite::from_image(&load_scaled(dir, "game_over.png")?);
        let results_panel = Sprite::from_image(&load_scaled(dir, "results_sheet.png")?);
        let medals = into_array(slice(&load_scaled(dir, "medals.png")?, 4, 1))?;
        let play_button = Sprite::from_image(&load_scaled(dir, "play_button.png")?);

        log::info!("sprites loaded from {}", dir.display());

        Ok(Self {
            backgrounds,
            birds,
            ground,
            pipes,
            pipes_flipped,
            big_digits,
            small_digits,
            get_ready,
            game_over,
            results_panel,
            medals,
            play_button,
        })
    }

    pub fn get(&self, id: SpriteId) -> &Sprite {
        match id {
            SpriteId::Background(Background::Day) => &self.backgrounds[0],
            SpriteId::Background(Background::Night) => &self.backgrounds[1],
            SpriteId::Bird { variant, frame } => {
                let v = match variant {
                    BirdVariant::Yellow => 0,
                    BirdVariant::Red => 1,
                    BirdVariant::Blue => 2,
                };
                &self.birds[v][usize::from(frame.min(2))]
            }
            SpriteId::Pipe { skin, flipped } => {
                let s = match skin {
                    PipeSkin::Green => 0,
                    PipeSkin::Red => 1,
                };
                if flipped {
                    &self.pipes_flipped[s]
                } else {
                    &self.pipes[s]
                }
            }
            SpriteId::Ground => &self.ground,
            SpriteId::BigDigit(d) => &self.big_digits[usize::from(d.min(9))],
            SpriteId::SmallDigit(d) => &self.small_digits[usize::from(d.min(9))],
            SpriteId::GetReady => &self.get_ready,
            SpriteId::GameOver => &self.game_over,
            SpriteId::ResultsPanel => &self.results_panel,
            SpriteId::Medal(medal) => {
                let m = match medal {
                    Medal::Bronze => 0,
                    Medal::Silver => 1,
                    Medal::Gold => 2,
                    Medal::Platinum => 3,
                };
                &self.medals[m]
            }
            SpriteId::PlayButton => &self.play_button,
        }
    }
}

fn load_scaled(dir: &Path, name: &str) -> Result<RgbaImage, Box<dyn Error>> {
    let path = dir.join(name);
    let img = image::open(&path)
        .map_err(|err| format!("{}: {err}", path.display()))?
        .to_rgba8();
    Ok(scale2x(&img))
}

/// Nearest-neighbour 2x upscale, keeping the pixel-art edges crisp
fn scale2x(img: &RgbaImage) -> RgbaImage {
    RgbaImage::from_fn(img.width() * 2, img.height() * 2, |x, y| {
        *img.get_pixel(x / 2, y / 2)
    })
}

/// Split a sheet into `cols` x `rows` equal cells, row-major
fn slice(sheet: &RgbaImage, cols: u32, rows: u32) -> Vec<Sprite> {
    let w = sheet.width() / cols;
    let h = sheet.height() / rows;
    let mut cells = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let cell = RgbaImage::from_fn(w, h, |x, y| *sheet.get_pixel(col * w + x, row * h + y));
            cells.push(Sprite::from_image(&cell));
        }
    }
    cells
}

fn into_array<const N: usize>(cells: Vec<Sprite>) -> Result<[Sprite; N], Box<dyn Error>> {
    cells
        .try_into()
        .map_err(|_| "sprite sheet has the wrong cell count".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn checker(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |x, y| {
            let v = ((x + y) % 2 * 255) as u8;
            Rgba([v, v, v, 255])
        })
    }

    #[test]
    fn scale2x_doubles_without_smoothing() {
        let img = checker(3, 2);
        let scaled = scale2x(&img);
        assert_eq!(scaled.dimensions(), (6, 4));
        // each source pixel becomes a 2x2 block of itself
        assert_eq!(scaled.get_pixel(0, 0), scaled.get_pixel(1, 1));
        assert_eq!(scaled.get_pixel(2, 0), scaled.get_pixel(3, 1));
        assert_ne!(scaled.get_pixel(1, 1), scaled.get_pixel(2, 1));
    }

    #[test]
    fn slicing_is_row_major() {
        let sheet = RgbaImage::from_fn(4, 2, |x, y| Rgba([(y * 4 + x) as u8, 0, 0, 255]));
        let cells = slice(&sheet, 2, 2);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].data[0], 0);
        assert_eq!(cells[1].data[0], 2);
        assert_eq!(cells[2].data[0], 4);
        assert_eq!(cells[3].data[0], 6);
        assert_eq!((cells[0].w, cells[0].h), (2, 1));
    }

    #[test]
    fn vertical_flip_reverses_rows() {
        let img = RgbaImage::from_fn(1, 3, |_, y| Rgba([y as u8, 0, 0, 255]));
        let flipped = Sprite::from_image(&img).flipped_vertical();
        assert_eq!(flipped.data[0], 2);
        assert_eq!(flipped.data[4], 1);
        assert_eq!(flipped.data[8], 0);
    }
}
