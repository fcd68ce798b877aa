use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::band::BandId;
use crate::consts::{BAND_COUNT, DEFAULT_BASE_NAME};
use crate::error::{EmberError, Result};

/// The file holding each of bands 1-7, plus the base name for outputs.
#[derive(Clone, Debug)]
pub struct BandFiles {
    paths: Vec<PathBuf>,
    pub base_name: String,
}

impl BandFiles {
    /// Locate bands 1-7 among `inputs`. Directories are searched one level
    /// deep. Files for other bands (panchromatic, cirrus, thermal) and files
    /// without a band number are skipped.
    pub fn discover(inputs: &[PathBuf]) -> Result<Self> {
        let mut candidates = Vec::new();
        for input in inputs {
            if input.is_dir() {
                let mut entries: Vec<PathBuf> = std::fs::read_dir(input)?
                    .filter_map(|e| e.ok().map(|e| e.path()))
                    .filter(|p| p.is_file())
                    .collect();
                entries.sort();
                candidates.extend(entries);
            } else {
                candidates.push(input.clone());
            }
        }

        let mut slots: Vec<Option<PathBuf>> = vec![None; BAND_COUNT];
        for path in candidates {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let Some(id) = parse_band_number(name).and_then(BandId::from_number) else {
                debug!(file = name, "Skipping file that is not one of bands 1-7");
                continue;
            };
            let slot = &mut slots[id.number() as usize - 1];
            if slot.is_some() {
                return Err(EmberError::DuplicateBand { band: id.number() });
            }
            info!(band = %id, file = name, "Band located");
            *slot = Some(path);
        }

        let mut paths = Vec::with_capacity(BAND_COUNT);
        for (id, slot) in BandId::ALL.iter().zip(slots) {
            paths.push(slot.ok_or(EmberError::MissingBand { band: id.number() })?);
        }

        let base_name = base_name(&paths);
        Ok(Self { paths, base_name })
    }

    pub fn path(&self, id: BandId) -> &Path {
        &self.paths[id.number() as usize - 1]
    }

    /// Bands in order 1 through 7.
    pub fn iter(&self) -> impl Iterator<Item = (BandId, &Path)> + '_ {
        BandId::ALL.iter().map(|&id| (id, self.path(id)))
    }
}

/// Band number from a Landsat product file name ending in
/// `_B<digits>.TIF` or `_B<digits>.TIFF`, case-insensitive.
///
/// Sidecars such as `_B5.TIF.aux.xml` or `_B5.TIF.ovr` do not match.
pub fn parse_band_number(file_name: &str) -> Option<u8> {
    let upper = file_name.to_ascii_uppercase();
    let stem = upper
        .strip_suffix(".TIF")
        .or_else(|| upper.strip_suffix(".TIFF"))?;
    let idx = stem.rfind("_B")?;
    let digits = &stem[idx + 2..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Longest common prefix of the file names with trailing `_` and `B`
/// characters removed.
pub fn base_name(paths: &[PathBuf]) -> String {
    let names: Vec<&str> = paths
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()))
        .collect();
    let Some(first) = names.first() else {
        return DEFAULT_BASE_NAME.to_string();
    };

    let mut prefix_len = first.len();
    for name in &names[1..] {
        prefix_len = first
            .char_indices()
            .zip(name.chars())
            .take_while(|((_, a), b)| a == b)
            .last()
            .map(|((i, c), _)| i + c.len_utf8())
            .unwrap_or(0)
            .min(prefix_len);
    }

    let trimmed = first[..prefix_len].trim_end_matches(|c| c == '_' || c == 'B');
    if trimmed.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}
