//! Display that writes frames to disk and replays scripted key presses.

use image::RgbImage;
use renderer::png::write_png;
use std::collections::VecDeque;
use std::path::PathBuf;
use thermal_common::ThermalResult;
use tracing::{debug, info};
use viewer::{Display, DisplayError, InputCode};

pub struct HeadlessDisplay {
    snapshot_dir: Option<PathBuf>,
    keys: VecDeque<Option<InputCode>>,
    presented: u64,
}

impl HeadlessDisplay {
    pub fn new(snapshot_dir: Option<PathBuf>, keys: Vec<Option<InputCode>>) -> Self {
        Self {
            snapshot_dir,
            keys: keys.into(),
            presented: 0,
        }
    }
}

impl Display for HeadlessDisplay {
    fn present(&mut self, image: &RgbImage) -> Result<(), DisplayError> {
        self.presented += 1;
        if let Some(dir) = &self.snapshot_dir {
            let path = dir.join(format!("frame_{:05}.png", self.presented));
            write_png(image, &path).map_err(|e| DisplayError::Present(e.to_string()))?;
            debug!(path = %path.display(), "Wrote snapshot");
        }
        Ok(())
    }

    fn poll_input(&mut self) -> Option<InputCode> {
        self.keys.pop_front().flatten()
    }

    fn release(&mut self) {
        info!(frames = self.presented, "Display released");
    }
}

/// Parse a comma-separated key script. Empty entries and `-` mean no key
/// for that iteration.
pub fn parse_key_script(script: &str) -> ThermalResult<Vec<Option<InputCode>>> {
    script
        .split(',')
        .map(|entry| match entry.trim() {
            "" | "-" => Ok(None),
            name => name.parse().map(Some),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_script() {
        let keys = parse_key_script("d,,w, esc ,-").unwrap();
        assert_eq!(
            keys,
            vec![
                Some(InputCode::Char('d')),
                None,
                Some(InputCode::Char('w')),
                Some(InputCode::Escape),
                None,
            ]
        );
        assert!(parse_key_script("d,ctrl").is_err());
    }

    #[test]
    fn test_snapshots_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = HeadlessDisplay::new(Some(dir.path().to_path_buf()), Vec::new());
        display.present(&RgbImage::new(8, 6)).unwrap();
        display.present(&RgbImage::new(8, 6)).unwrap();

        assert!(dir.path().join("frame_00001.png").exists());
        assert!(dir.path().join("frame_00002.png").exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_missing_snapshot_dir_is_present_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut display = HeadlessDisplay::new(Some(dir.path().join("nope")), Vec::new());
        assert!(matches!(
            display.present(&RgbImage::new(2, 2)),
            Err(DisplayError::Present(_))
        ));
    }

    #[test]
    fn test_keys_run_out() {
        let mut display = HeadlessDisplay::new(None, vec![Some(InputCode::Char('f'))]);
        assert_eq!(display.poll_input(), Some(InputCode::Char('f')));
        assert_eq!(display.poll_input(), None);
    }
}
