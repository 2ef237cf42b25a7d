use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use macroquad::audio::{load_sound, play_sound_once, Sound};
use macroquad::prelude::*;
use serde_json::Value as JsonValue;
use tileworld::loader::json_loader::read_json;
use tileworld::{AssetError, AssetStore, AudioSink, FrameHandle};
use tracing::{debug, info, warn};

/// Textures, fonts and sounds read from an asset directory.
///
/// Layout: `tileset.png`, `player.png`, `font.ttf`, `sounds/<cue>.wav|ogg`,
/// and per event `eventID/<id>.json` (dialogue) plus `eventID/<id>/*.png`
/// (animation frames, played in file-name order).
pub struct DiskAssets {
    root: PathBuf,
    pub tileset: Texture2D,
    pub player: Texture2D,
    pub font: Font,
    sounds: HashMap<String, Sound>,
    frames: HashMap<u32, Texture2D>,
    next_frame: u32,
}

async fn texture(path: &Path) -> anyhow::Result<Texture2D> {
    let tex = load_texture(&path.to_string_lossy())
        .await
        .with_context(|| format!("Loading texture {}", path.display()))?;
    tex.set_filter(FilterMode::Nearest);
    Ok(tex)
}

impl DiskAssets {
    /// Load the core sprites, font and every sound cue. Any failure here is
    /// fatal to the caller.
    pub async fn load(root: &Path) -> anyhow::Result<Self> {
        let tileset = texture(&root.join("tileset.png")).await?;
        let player = texture(&root.join("player.png")).await?;
        let font_path = root.join("font.ttf");
        let font = load_ttf_font(&font_path.to_string_lossy())
            .await
            .with_context(|| format!("Opening font {}", font_path.display()))?;

        let mut sounds = HashMap::new();
        let sound_dir = root.join("sounds");
        if sound_dir.is_dir() {
            let entries = std::fs::read_dir(&sound_dir)
                .with_context(|| format!("Reading {}", sound_dir.display()))?;
            for entry in entries.filter_map(Result::ok) {
                let path = entry.path();
                let ext = path.extension().and_then(|e| e.to_str());
                let Some(cue) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if !matches!(ext, Some("wav") | Some("ogg")) {
                    continue;
                }
                let sound = load_sound(&path.to_string_lossy())
                    .await
                    .with_context(|| format!("Loading sound {}", path.display()))?;
                sounds.insert(cue.to_string(), sound);
            }
        }
        info!(root = %root.display(), sounds = sounds.len(), "assets_loaded");

        Ok(DiskAssets {
            root: root.to_path_buf(),
            tileset,
            player,
            font,
            sounds,
            frames: HashMap::new(),
            next_frame: 0,
        })
    }

    pub fn frame(&self, handle: FrameHandle) -> Option<&Texture2D> {
        self.frames.get(&handle.0)
    }

    fn event_path(&self, event_id: i64) -> PathBuf {
        self.root.join("eventID").join(event_id.to_string())
    }
}

/// Frame files of one event, sorted by name.
///
/// No directory and an empty directory both mean the event has no animation.
/// A directory that exists but cannot be listed is an error.
fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>, AssetError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|source| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("png"))
        .collect();
    paths.sort();
    Ok(paths)
}

impl AssetStore for DiskAssets {
    fn load_event_frames(&mut self, event_id: i64) -> Result<Vec<FrameHandle>, AssetError> {
        let dir = self.event_path(event_id);
        let paths = frame_paths(&dir)?;
        if paths.is_empty() {
            warn!(event_id, dir = %dir.display(), "event_frames_missing");
            return Ok(Vec::new());
        }

        let mut handles = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = std::fs::read(&path).map_err(|source| AssetError::Io {
                path: path.clone(),
                source,
            })?;
            let image = Image::from_file_with_format(&bytes, None).map_err(|e| {
                AssetError::Decode {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            let tex = Texture2D::from_image(&image);
            tex.set_filter(FilterMode::Nearest);
            let handle = FrameHandle(self.next_frame);
            self.next_frame = self.next_frame.wrapping_add(1);
            self.frames.insert(handle.0, tex);
            handles.push(handle);
        }
        info!(event_id, frames = handles.len(), "event_frames_loaded");
        Ok(handles)
    }

    fn release_frames(&mut self, frames: Vec<FrameHandle>) {
        for handle in frames {
            self.frames.remove(&handle.0);
        }
    }

    fn dialogue_document(&mut self, event_id: i64) -> Result<Option<JsonValue>, AssetError> {
        let path = self.event_path(event_id).with_extension("json");
        if !path.is_file() {
            return Ok(None);
        }
        match read_json(&path) {
            Ok(doc) => Ok(Some(doc)),
            Err(error) => {
                warn!(event_id, error = %error, "dialogue_document_unreadable");
                Ok(None)
            }
        }
    }
}

impl AudioSink for DiskAssets {
    fn play(&mut self, cue: &str) {
        match self.sounds.get(cue) {
            Some(sound) => play_sound_once(sound),
            None => debug!(cue, "sound_cue_missing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock went backwards")
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("tileworld_assets_{tag}_{nanos}"));
        fs::create_dir_all(&dir).expect("failed to create temp dir");
        dir
    }

    #[test]
    fn absent_and_empty_frame_dirs_both_mean_no_animation() {
        let root = temp_dir("frames_none");
        let empty = root.join("7");
        fs::create_dir_all(&empty).expect("mkdir");
        fs::write(empty.join("readme.txt"), "not a frame").expect("write");

        assert!(frame_paths(&root.join("6")).expect("absent dir").is_empty());
        assert!(frame_paths(&empty).expect("empty dir").is_empty());

        fs::remove_dir_all(&root).expect("cleanup");
    }

    #[test]
    fn frames_are_listed_in_name_order() {
        let dir = temp_dir("frames_sorted");
        for name in ["b.png", "a.png", "c.txt", "c.png"] {
            fs::write(dir.join(name), b"").expect("write");
        }

        let names: Vec<_> = frame_paths(&dir)
            .expect("listing")
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);

        fs::remove_dir_all(&dir).expect("cleanup");
    }
}
