//! Geotagged image scanning.
//!
//! Builds the image location index from EXIF GPS metadata. The index has
//! no ordering or temporal semantics; each rescan produces a fresh map
//! that the caller swaps in whole, so readers see either the old or the
//! new index, never a partial rebuild.

use std::collections::HashMap;
use std::fs;
use std::io::BufReader;
use std::path::Path;

use exif::{In, Reader, Tag, Value};
use log::{info, warn};
use trackmerge::GpsCoords;

use crate::error::{LivetrackError, Result};

use super::{has_extension, visit_files};

/// Rebuild the image location index from scratch.
pub fn scan_images(dir: &Path) -> HashMap<String, GpsCoords> {
    let mut index = HashMap::new();

    visit_files(dir, &mut |path| {
        if !has_extension(path, &["jpg", "jpeg", "tif", "tiff"]) {
            return;
        }
        match extract_gps_coords(path) {
            Ok(Some(coords)) => {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    index.insert(name.to_string(), coords);
                }
            }
            Ok(None) => {} // image has no GPS data
            Err(e) => warn!("Error extracting GPS coordinates: {}", e),
        }
    });

    info!(
        "Indexed {} geotagged images under {}",
        index.len(),
        dir.display()
    );
    index
}

/// Extract GPS coordinates from an image's EXIF block, if present.
fn extract_gps_coords(path: &Path) -> Result<Option<GpsCoords>> {
    let file = fs::File::open(path).map_err(|source| LivetrackError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::new(file);
    let exif = Reader::new()
        .read_from_container(&mut reader)
        .map_err(|e| LivetrackError::ExifRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let lat = dms_to_degrees(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef);
    let lng = dms_to_degrees(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef);

    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Some(GpsCoords::new(lat, lng))),
        _ => Ok(None),
    }
}

/// Convert an EXIF degrees/minutes/seconds triple plus its hemisphere
/// reference into signed decimal degrees.
fn dms_to_degrees(exif: &exif::Exif, tag: Tag, ref_tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Rational(ref parts) = field.value else {
        return None;
    };
    if parts.len() < 3 {
        return None;
    }

    let degrees = parts[0].to_f64() + parts[1].to_f64() / 60.0 + parts[2].to_f64() / 3600.0;

    let reference = exif.get_field(ref_tag, In::PRIMARY).and_then(|f| match f.value {
        Value::Ascii(ref v) => v.first().and_then(|s| s.first()).copied(),
        _ => None,
    });

    match reference {
        Some(b'S') | Some(b'W') => Some(-degrees),
        _ => Some(degrees),
    }
}
