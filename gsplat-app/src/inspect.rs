//! `inspect` and `header` commands.

use crate::config::AppError;
use glam::Vec3;
use gsplat_data::{ImportSettings, SplatAsset, SplatPlyHeader, import_ply_with_progress};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Printed result of a full decode.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub name: String,
    pub splat_count: u32,
    pub sh_bands: u8,
    pub sh_coeffs_per_point: usize,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    pub bounds_size: Vec3,
    /// Mean of the sigmoid-activated opacities.
    pub mean_opacity: f32,
}

impl Summary {
    pub fn from_asset(asset: &SplatAsset) -> Self {
        let attributes = &asset.attributes;
        let bounds = asset.bounds();
        let mean_opacity = if attributes.is_empty() {
            0.0
        } else {
            attributes.colors.iter().map(|c| c.w).sum::<f32>() / attributes.colors.len() as f32
        };

        Self {
            name: asset.name.clone(),
            splat_count: asset.splat_count(),
            sh_bands: asset.sh_bands(),
            sh_coeffs_per_point: attributes.sh_coeffs_per_point(),
            bounds_min: bounds.min,
            bounds_max: bounds.max,
            bounds_size: bounds.size(),
            mean_opacity,
        }
    }
}

pub fn inspect(path: &Path, settings: &ImportSettings, json: bool) -> Result<(), AppError> {
    let mut last_decile = 0;
    let asset = import_ply_with_progress(path, settings, |progress| {
        let decile = (progress * 10.0) as u32;
        if decile > last_decile {
            last_decile = decile;
            debug!("Reading vertices: {}%", decile * 10);
        }
    })?;

    let summary = Summary::from_asset(&asset);
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("name:          {}", summary.name);
        println!("splats:        {}", summary.splat_count);
        println!(
            "sh bands:      {} ({} coefficients per splat)",
            summary.sh_bands, summary.sh_coeffs_per_point
        );
        println!("bounds min:    {}", summary.bounds_min);
        println!("bounds max:    {}", summary.bounds_max);
        println!("bounds size:   {}", summary.bounds_size);
        println!("mean opacity:  {:.4}", summary.mean_opacity);
    }
    Ok(())
}

pub fn header(path: &Path) -> Result<(), AppError> {
    let mut reader = BufReader::new(File::open(path)?);
    let header = SplatPlyHeader::read(&mut reader)?;

    println!("format:        {}", header.format.as_deref().unwrap_or("(none)"));
    println!("vertices:      {}", header.vertex_count);
    println!(
        "properties:    {} ({} bytes per record)",
        header.property_count,
        header.record_len()
    );
    println!("sh properties: {}", header.sh_property_count);
    for (index, property) in header.properties.iter().enumerate() {
        println!("  [{:>3}] {:<8} {}", index, property.scalar_type, property.name);
    }

    let fields = [
        ("position", header.position_offset),
        ("color", header.color_offset),
        ("sh", header.sh_offset),
        ("opacity", header.opacity_offset),
        ("scale", header.scale_offset),
        ("rotation", header.rotation_offset),
    ];
    for (name, offset) in fields {
        match offset {
            Some(offset) => println!("  {:<10} @ {}", name, offset),
            None => println!("  {:<10} missing", name),
        }
    }

    let layout = header.layout()?;
    layout.check_extents()?;
    println!("layout valid, {} SH bands", layout.sh_bands);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use gsplat_data::{Bounds, SplatAttributes};

    #[test]
    fn test_summary_from_asset() {
        let mut bounds = Bounds::from_point(Vec3::ZERO);
        bounds.encapsulate(Vec3::new(2.0, 4.0, 6.0));
        let attributes = SplatAttributes {
            positions: vec![Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0)],
            colors: vec![Vec4::new(0.0, 0.0, 0.0, 0.25), Vec4::new(0.0, 0.0, 0.0, 0.75)],
            bounds,
            ..Default::default()
        };
        let summary = Summary::from_asset(&SplatAsset::new("scene", attributes));

        assert_eq!(summary.splat_count, 2);
        assert_eq!(summary.bounds_size, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(summary.mean_opacity, 0.5);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["name"], "scene");
        assert_eq!(json["sh_bands"], 0);
    }

    #[test]
    fn test_summary_empty_asset() {
        let summary = Summary::from_asset(&SplatAsset::new("empty", SplatAttributes::default()));
        assert_eq!(summary.splat_count, 0);
        assert_eq!(summary.mean_opacity, 0.0);
    }
}
