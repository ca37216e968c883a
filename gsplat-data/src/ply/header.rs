//! PLY header scanning and record layout validation.

use crate::ply::DecodeError;
use crate::sh::bands_from_sh_property_count;
use std::io::BufRead;
use tracing::{debug, warn};

const POSITION: &str = "x";
const COLOR: &str = "f_dc_0";
const SH_REST: &str = "f_rest_0";
const OPACITY: &str = "opacity";
const SCALE: &str = "scale_0";
const ROTATION: &str = "rot_0";

const SH_REST_PREFIX: &str = "f_rest_";
const END_HEADER: &str = "end_header";

/// A `property <type> <name>` declaration, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyProperty {
    pub name: String,
    /// Declared scalar type, e.g. `float` or `uchar`.
    pub scalar_type: String,
}

/// Header information gathered while scanning the text part of a PLY file.
///
/// Offsets index into the per-record float array. Each field claims a fixed
/// number of consecutive slots starting at its offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplatPlyHeader {
    pub vertex_count: u32,
    pub property_count: usize,
    pub sh_property_count: usize,
    pub position_offset: Option<usize>,
    pub color_offset: Option<usize>,
    pub sh_offset: Option<usize>,
    pub opacity_offset: Option<usize>,
    pub scale_offset: Option<usize>,
    pub rotation_offset: Option<usize>,
    /// Declared body format, e.g. `binary_little_endian`.
    pub format: Option<String>,
    /// Every declared property. Records are still read as f32 regardless of
    /// the declared type.
    pub properties: Vec<PlyProperty>,
    /// Bytes consumed by the header, including line terminators.
    pub header_len: u64,
}

impl SplatPlyHeader {
    /// Scan header lines until `end_header` or end of stream.
    ///
    /// Reaching end of stream without `end_header` is not an error here; the
    /// counts keep their last-seen values and validation catches the rest.
    pub fn read<R: BufRead>(reader: &mut R) -> Result<Self, DecodeError> {
        let mut header = Self::default();
        let mut buf = Vec::new();

        while let Some(line) = read_line(reader, &mut buf, &mut header.header_len)? {
            if line == END_HEADER {
                break;
            }
            header.apply_line(&line)?;
        }

        debug!(
            vertex_count = header.vertex_count,
            property_count = header.property_count,
            sh_property_count = header.sh_property_count,
            "Read PLY header"
        );
        Ok(header)
    }

    fn apply_line(&mut self, line: &str) -> Result<(), DecodeError> {
        let tokens: Vec<&str> = line.split(' ').collect();
        let &[keyword, kind, name] = tokens.as_slice() else {
            return Ok(());
        };

        match keyword {
            "element" if kind == "vertex" => {
                self.vertex_count = name.parse().map_err(|source| DecodeError::HeaderParse {
                    value: name.to_string(),
                    source,
                })?;
            }
            "format" => {
                if kind != "binary_little_endian" {
                    warn!("PLY format '{}' is read as binary little-endian", kind);
                }
                self.format = Some(kind.to_string());
            }
            "property" => {
                if kind != "float" {
                    warn!("Property '{}' of type '{}' is read as float", name, kind);
                }
                let index = self.property_count;
                if let Some(slot) = self.field_slot(name) {
                    // First occurrence wins.
                    if slot.is_none() {
                        *slot = Some(index);
                    }
                }
                if name.starts_with(SH_REST_PREFIX) {
                    self.sh_property_count += 1;
                }
                self.properties.push(PlyProperty {
                    name: name.to_string(),
                    scalar_type: kind.to_string(),
                });
                self.property_count += 1;
            }
            _ => {}
        }
        Ok(())
    }

    fn field_slot(&mut self, name: &str) -> Option<&mut Option<usize>> {
        match name {
            POSITION => Some(&mut self.position_offset),
            COLOR => Some(&mut self.color_offset),
            SH_REST => Some(&mut self.sh_offset),
            OPACITY => Some(&mut self.opacity_offset),
            SCALE => Some(&mut self.scale_offset),
            ROTATION => Some(&mut self.rotation_offset),
            _ => None,
        }
    }

    /// Size in bytes of one binary record.
    pub fn record_len(&self) -> usize {
        self.property_count * size_of::<f32>()
    }

    /// Validate the SH layout and the presence of required fields.
    pub fn layout(&self) -> Result<RecordLayout, DecodeError> {
        let sh_bands = bands_from_sh_property_count(self.sh_property_count)?;
        let sh_coeffs_per_point = self.sh_property_count / 3;

        let required = [
            (POSITION, self.position_offset),
            (COLOR, self.color_offset),
            (OPACITY, self.opacity_offset),
            (SCALE, self.scale_offset),
            (ROTATION, self.rotation_offset),
        ];
        let mut missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, offset)| offset.is_none())
            .map(|(name, _)| *name)
            .collect();
        // SH values without their first coefficient cannot be located.
        if sh_coeffs_per_point > 0 && self.sh_offset.is_none() {
            missing.push(SH_REST);
        }

        match (
            self.position_offset,
            self.color_offset,
            self.opacity_offset,
            self.scale_offset,
            self.rotation_offset,
        ) {
            (Some(position), Some(color), Some(opacity), Some(scale), Some(rotation))
                if missing.is_empty() =>
            {
                Ok(RecordLayout {
                    property_count: self.property_count,
                    position,
                    color,
                    opacity,
                    scale,
                    rotation,
                    sh: self.sh_offset.filter(|_| sh_coeffs_per_point > 0),
                    sh_coeffs_per_point,
                    sh_bands,
                })
            }
            _ => Err(DecodeError::MissingRequiredProperty { missing }),
        }
    }
}

/// Validated slot layout of a splat record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    pub property_count: usize,
    pub position: usize,
    pub color: usize,
    pub opacity: usize,
    pub scale: usize,
    pub rotation: usize,
    pub sh: Option<usize>,
    pub sh_coeffs_per_point: usize,
    pub sh_bands: u8,
}

impl RecordLayout {
    /// Check that every field's claimed slots fit inside one record.
    pub fn check_extents(&self) -> Result<(), DecodeError> {
        let fields = [
            (POSITION, Some(self.position), 3),
            (COLOR, Some(self.color), 3),
            (OPACITY, Some(self.opacity), 1),
            (SCALE, Some(self.scale), 3),
            (ROTATION, Some(self.rotation), 4),
            (SH_REST, self.sh, self.sh_coeffs_per_point * 3),
        ];

        for (name, offset, width) in fields {
            let Some(offset) = offset else { continue };
            if offset + width > self.property_count {
                return Err(DecodeError::PropertyOutOfRange {
                    name,
                    offset,
                    width,
                    property_count: self.property_count,
                });
            }
        }
        Ok(())
    }
}

/// Read one header line, stripping `\n` and a preceding `\r`.
///
/// Returns `None` at end of stream.
fn read_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    consumed: &mut u64,
) -> std::io::Result<Option<String>> {
    buf.clear();
    let read = reader.read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(None);
    }
    *consumed += read as u64;

    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}
