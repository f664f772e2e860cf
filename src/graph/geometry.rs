//! Grid <-> rendering-surface mapping.
//!
//! The grid origin sits at the centre of the surface, `gy` grows upwards, and one grid unit is
//! `min(width, height) / GRID_SPAN` pixels, so a node keeps its relative place when the surface
//! is resized.

use crate::config::GRID_SPAN;

/// A position on the rendering surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderPoint {
	/// Pixels from the left edge.
	pub x: f64,
	/// Pixels from the top edge.
	pub y: f64,
}

/// A position on the logical grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridPoint {
	/// Grid x.
	pub gx: f64,
	/// Grid y.
	pub gy: f64,
}

impl GridPoint {
	/// Nearest whole grid cell.
	pub fn snapped(self) -> Self {
		Self {
			gx: self.gx.round(),
			gy: self.gy.round(),
		}
	}
}

fn unit(width: f64, height: f64) -> f64 {
	width.min(height).max(0.0) / GRID_SPAN
}

/// Map grid coordinates to a pixel position on a `width` x `height` surface.
pub fn to_render_point(gx: f64, gy: f64, width: f64, height: f64) -> RenderPoint {
	let u = unit(width, height);
	RenderPoint {
		x: width / 2.0 + gx * u,
		y: height / 2.0 - gy * u,
	}
}

/// Inverse of [`to_render_point`]. `None` for a surface with no area, where every grid point
/// collapses onto the centre.
pub fn from_render_point(x: f64, y: f64, width: f64, height: f64) -> Option<GridPoint> {
	let u = unit(width, height);
	if !(u > 0.0) {
		return None;
	}
	Some(GridPoint {
		gx: (x - width / 2.0) / u,
		gy: (height / 2.0 - y) / u,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn origin_is_the_centre() {
		assert_eq!(
			to_render_point(0.0, 0.0, 800.0, 600.0),
			RenderPoint { x: 400.0, y: 300.0 }
		);
	}

	#[test]
	fn grid_y_points_up() {
		let p = to_render_point(-1.0, 2.0, 1000.0, 1000.0);
		assert_eq!(p, RenderPoint { x: 400.0, y: 300.0 });
	}

	#[test]
	fn unit_follows_shorter_side() {
		let p = to_render_point(1.0, 1.0, 2000.0, 500.0);
		assert_eq!(p, RenderPoint { x: 1050.0, y: 200.0 });
	}

	#[test]
	fn inverse_recovers_grid_coordinates() {
		for &(gx, gy) in &[(0.0, 0.0), (-1.0, 2.0), (3.0, -4.0), (0.5, 0.25)] {
			let p = to_render_point(gx, gy, 1000.0, 1000.0);
			let back = from_render_point(p.x, p.y, 1000.0, 1000.0).unwrap();
			assert_eq!(back, GridPoint { gx, gy });
		}
	}

	#[test]
	fn empty_surface_has_no_inverse() {
		assert_eq!(from_render_point(0.0, 0.0, 0.0, 400.0), None);
	}

	#[test]
	fn snapping_rounds_to_cells() {
		let p = GridPoint { gx: 1.4, gy: -2.6 }.snapped();
		assert_eq!(p, GridPoint { gx: 1.0, gy: -3.0 });
	}
}
