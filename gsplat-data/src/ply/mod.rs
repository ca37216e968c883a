//! Binary PLY splat decoding

mod decoder;
mod error;
mod header;

pub use decoder::{MAX_INPUT_LEN, SplatPlyDecoder, ZeroRotationPolicy, check_input_len};
pub use error::DecodeError;
pub use header::{PlyProperty, RecordLayout, SplatPlyHeader};

#[cfg(test)]
pub(crate) mod test_util {
    /// Property names of a minimal splat file without SH.
    pub const BASIC_PROPERTIES: [&str; 14] = [
        "x", "y", "z", "f_dc_0", "f_dc_1", "f_dc_2", "opacity", "scale_0", "scale_1", "scale_2",
        "rot_0", "rot_1", "rot_2", "rot_3",
    ];

    /// Build the text header of a binary little-endian splat file.
    pub fn header(vertex_count: u32, properties: &[&str]) -> String {
        let mut header = String::from("ply\nformat binary_little_endian 1.0\n");
        header.push_str(&format!("element vertex {vertex_count}\n"));
        for name in properties {
            header.push_str(&format!("property float {name}\n"));
        }
        header.push_str("end_header\n");
        header
    }

    /// Build a complete file from a header and raw float records.
    pub fn ply_bytes(vertex_count: u32, properties: &[&str], records: &[Vec<f32>]) -> Vec<u8> {
        let mut bytes = header(vertex_count, properties).into_bytes();
        for value in records.iter().flatten() {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }
}
