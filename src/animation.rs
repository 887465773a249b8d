//! Named frame ranges on a sprite sheet and the clock that steps through them.

use std::collections::HashMap;
use std::time::Duration;

use image::RgbaImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::api::{PixelSource, SpriteView};
use crate::error::CoreError;
use crate::types::Rect;

/// One named animation in static configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationEntry {
    pub key: String,
    pub start_frame: u32,
    pub frame_count: u32,
}

/// Static animation configuration, rebuilt into an [`AnimationTable`] each run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub frame_width: i32,
    pub frame_height: i32,
    /// Time each frame stays on screen, in milliseconds.
    pub frame_rate_ms: u64,
    #[serde(default)]
    pub animations: Vec<AnimationEntry>,
}

/// Animation key -> (start frame, frame count), with a shared frame size and rate.
#[derive(Clone, Debug)]
pub struct AnimationTable {
    frame_width: i32,
    frame_height: i32,
    frame_rate: Duration,
    entries: HashMap<String, (u32, u32)>,
}

impl AnimationTable {
    pub fn new(frame_width: i32, frame_height: i32, frame_rate: Duration) -> Result<Self, CoreError> {
        if frame_width <= 0 || frame_height <= 0 {
            return Err(CoreError::InvalidFrameSize { width: frame_width, height: frame_height });
        }
        Ok(Self { frame_width, frame_height, frame_rate, entries: HashMap::new() })
    }

    pub fn from_config(cfg: &AnimationConfig) -> Result<Self, CoreError> {
        let rate = Duration::from_millis(cfg.frame_rate_ms);
        let mut table = Self::new(cfg.frame_width, cfg.frame_height, rate)?;
        for entry in &cfg.animations {
            table.add(&entry.key, entry.start_frame, entry.frame_count)?;
        }
        Ok(table)
    }

    /// Register an animation. Keys are unique.
    pub fn add(&mut self, key: &str, start_frame: u32, frame_count: u32) -> Result<(), CoreError> {
        if self.entries.contains_key(key) {
            return Err(CoreError::DuplicateAnimation(key.to_owned()));
        }
        if frame_count == 0 {
            return Err(CoreError::EmptyAnimation { key: key.to_owned() });
        }
        let last = u64::from(start_frame) + u64::from(frame_count) - 1;
        if last > i32::MAX as u64 {
            return Err(CoreError::FrameOutOfRange { key: key.to_owned(), frame: last });
        }
        self.entries.insert(key.to_owned(), (start_frame, frame_count));
        Ok(())
    }

    fn entry(&self, key: &str) -> Result<(u32, u32), CoreError> {
        self.entries
            .get(key)
            .copied()
            .ok_or_else(|| CoreError::UnknownAnimation(key.to_owned()))
    }

    pub fn start_tile(&self, key: &str) -> Result<u32, CoreError> {
        Ok(self.entry(key)?.0)
    }

    pub fn frame_count(&self, key: &str) -> Result<u32, CoreError> {
        Ok(self.entry(key)?.1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn frame_size(&self) -> (i32, i32) {
        (self.frame_width, self.frame_height)
    }

    pub fn frame_rate(&self) -> Duration {
        self.frame_rate
    }

    /// Texture sub-rectangle of frame `current_frame` of `key` on a sheet
    /// `texture_width` pixels wide, frames laid out left to right, top to bottom.
    pub fn source_rect(&self, key: &str, current_frame: u32, texture_width: u32) -> Result<Rect, CoreError> {
        let start = self.start_tile(key)?;
        let frame = u64::from(start) + u64::from(current_frame);
        let out_of_range = || CoreError::FrameOutOfRange { key: key.to_owned(), frame };
        let index = i32::try_from(frame).map_err(|_| out_of_range())?;
        let per_row = (i32::try_from(texture_width).unwrap_or(i32::MAX) / self.frame_width).max(1);
        let (column, row) = (index % per_row, index / per_row);
        let y = row.checked_mul(self.frame_height).ok_or_else(out_of_range)?;
        Ok(Rect::new(column * self.frame_width, y, self.frame_width, self.frame_height))
    }
}

/// Frame-timing state for one sprite.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnimationClock {
    current_frame: u32,
    since_advance: Duration,
    active_key: Option<String>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_frame(&self) -> u32 {
        self.current_frame
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active_key.as_deref()
    }

    /// Select the animation to play; `None` shows the raw texture.
    ///
    /// A different key restarts from its first frame. Re-selecting the active
    /// key keeps the current frame.
    pub fn set_animation(&mut self, table: &AnimationTable, key: Option<&str>) -> Result<(), CoreError> {
        if let Some(k) = key {
            if !table.contains(k) {
                return Err(CoreError::UnknownAnimation(k.to_owned()));
            }
        }
        if self.active_key.as_deref() == key {
            return Ok(());
        }
        debug!("animation {:?} -> {:?}", self.active_key, key);
        self.active_key = key.map(str::to_owned);
        self.current_frame = 0;
        self.since_advance = Duration::ZERO;
        Ok(())
    }

    /// Accumulate `elapsed`; once the accumulator reaches the table's frame
    /// rate, step to the next frame (wrapping) and reset it. Returns whether
    /// the frame changed.
    pub fn update(&mut self, table: &AnimationTable, elapsed: Duration) -> Result<bool, CoreError> {
        let Some(key) = self.active_key.as_deref() else {
            return Ok(false);
        };
        let count = table.frame_count(key)?;
        self.since_advance += elapsed;
        if self.since_advance >= table.frame_rate() {
            self.current_frame = (self.current_frame + 1) % count;
            self.since_advance = Duration::ZERO;
            return Ok(true);
        }
        Ok(false)
    }

    /// Current frame's texture sub-rectangle; the whole texture when no key is active.
    pub fn source_rect(&self, table: &AnimationTable, texture_width: u32, texture_height: u32) -> Result<Rect, CoreError> {
        match self.active_key.as_deref() {
            Some(key) => table.source_rect(key, self.current_frame, texture_width),
            None => Ok(Rect::new(0, 0, texture_width as i32, texture_height as i32)),
        }
    }
}

/// Sprite texture with optional sheet animation.
#[derive(Clone, Debug)]
pub struct AnimatedSprite {
    texture: RgbaImage,
    table: Option<AnimationTable>,
    clock: AnimationClock,
}

impl AnimatedSprite {
    /// Static sprite drawn from the whole texture.
    pub fn new(texture: RgbaImage) -> Self {
        Self { texture, table: None, clock: AnimationClock::new() }
    }

    pub fn with_animations(texture: RgbaImage, table: AnimationTable) -> Self {
        Self { texture, table: Some(table), clock: AnimationClock::new() }
    }

    pub fn table(&self) -> Option<&AnimationTable> {
        self.table.as_ref()
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn image(&self) -> &RgbaImage {
        &self.texture
    }

    pub fn set_animation(&mut self, key: Option<&str>) -> Result<(), CoreError> {
        match (&self.table, key) {
            (Some(table), _) => self.clock.set_animation(table, key),
            (None, None) => Ok(()),
            (None, Some(k)) => Err(CoreError::UnknownAnimation(k.to_owned())),
        }
    }

    /// Advance the frame clock. Static sprites never change frame.
    pub fn update(&mut self, elapsed: Duration) -> Result<bool, CoreError> {
        match &self.table {
            Some(table) => self.clock.update(table, elapsed),
            None => Ok(false),
        }
    }

    /// Width and height of what is drawn: one frame, or the whole texture.
    pub fn frame_size(&self) -> (i32, i32) {
        let b = self.bounds();
        (b.w, b.h)
    }

    fn full_texture(&self) -> Rect {
        let (w, h) = self.texture.dimensions();
        Rect::new(0, 0, w as i32, h as i32)
    }
}

impl SpriteView for AnimatedSprite {
    fn texture(&self) -> &dyn PixelSource {
        &self.texture
    }

    fn bounds(&self) -> Rect {
        let (w, h) = self.texture.dimensions();
        match &self.table {
            Some(table) => self.clock.source_rect(table, w, h).unwrap_or_else(|_| self.full_texture()),
            None => self.full_texture(),
        }
    }
}
