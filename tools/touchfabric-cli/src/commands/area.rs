//! Inspect and edit the active area file.

use std::path::PathBuf;

use touchfabric_model::area::ActiveArea;
use touchfabric_model::geometry::Vertex;

use crate::AreaAction;

pub fn run(file: PathBuf, action: AreaAction) -> anyhow::Result<()> {
    match action {
        AreaAction::Show => {
            if !file.exists() {
                println!("No active area at {}", file.display());
                return Ok(());
            }
            let area = ActiveArea::load(&file)?;
            println!("Active area: {}", file.display());
            println!("  State: {:?}", area.state());
            println!("  Vertices: {}", area.len());
            for (i, v) in area.vertices().iter().enumerate() {
                println!("    {i}: ({}, {})", v.x, v.y);
            }
            let bbox = area.bounding_box();
            if bbox.is_degenerate() {
                println!("  Bounding box: empty (no touches will be reported)");
            } else {
                println!(
                    "  Bounding box: ({}, {}) {}x{}",
                    bbox.min_x, bbox.min_y, bbox.width, bbox.height
                );
            }
        }
        AreaAction::Clear => {
            ActiveArea::new().save(&file)?;
            println!("Cleared active area at {}", file.display());
        }
        AreaAction::Add { x, y } => {
            let mut area = ActiveArea::load_or_empty(&file);
            area.add_vertex(Vertex::planar(x, y));
            area.close();
            area.save(&file)?;
            println!(
                "Added ({x}, {y}); {} vertices in {}",
                area.len(),
                file.display()
            );
        }
    }
    Ok(())
}
