//! Dendrogram layout and SVG rendering.
//!
//! Layout is geometry only: leaf display order plus the U-link segments
//! in (leaf-position, height) coordinates. Rendering sits behind the
//! `plotting` feature so headless builds skip the plotters dependency.

#[cfg(feature = "plotting")]
use std::path::Path;

use pathline_core::errors::{MatchError, MatchResult};

use super::linkage::Linkage;

/// One straight piece of a U-link, in leaf/height units.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Laid-out tree ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    /// Leaf indexes in left-to-right display order.
    pub leaf_order: Vec<usize>,
    /// Three segments per merge: two verticals joined by a crossbar.
    pub segments: Vec<LinkSegment>,
    /// Height of the final merge.
    pub max_height: f64,
}

/// Compute the drawing geometry for a linkage.
///
/// The traversal is iterative with an explicit stack; `depth_limit`
/// bounds the tree depth it will follow before giving up with
/// [`MatchError::DendrogramTooDeep`], which callers may retry with a
/// larger budget.
pub fn layout(linkage: &Linkage, depth_limit: usize) -> MatchResult<Dendrogram> {
    let n = linkage.n_leaves;
    let mut leaf_order = Vec::with_capacity(n);
    let mut segments = Vec::with_capacity(linkage.merges.len() * 3);

    let root = match linkage.root() {
        Some(root) => root,
        None => {
            // zero or one leaf: nothing to draw
            leaf_order.extend(0..n);
            return Ok(Dendrogram {
                leaf_order,
                segments,
                max_height: 0.0,
            });
        }
    };

    let mut x = vec![f64::NAN; n + linkage.merges.len()];
    // iterative post-order; the right child is pushed first so the left
    // subtree lays out before the right one
    let mut stack: Vec<(usize, usize, bool)> = vec![(root, 0, false)];
    while let Some((node, depth, expanded)) = stack.pop() {
        if node < n {
            x[node] = leaf_order.len() as f64 + 0.5;
            leaf_order.push(node);
            continue;
        }
        let merge = &linkage.merges[node - n];
        if expanded {
            let (xl, xr) = (x[merge.left], x[merge.right]);
            let h = merge.height;
            segments.push(LinkSegment {
                x1: xl,
                y1: linkage.node_height(merge.left),
                x2: xl,
                y2: h,
            });
            segments.push(LinkSegment {
                x1: xl,
                y1: h,
                x2: xr,
                y2: h,
            });
            segments.push(LinkSegment {
                x1: xr,
                y1: linkage.node_height(merge.right),
                x2: xr,
                y2: h,
            });
            x[node] = (xl + xr) / 2.0;
        } else {
            if depth > depth_limit {
                return Err(MatchError::DendrogramTooDeep {
                    depth,
                    limit: depth_limit,
                });
            }
            stack.push((node, depth, true));
            stack.push((merge.right, depth + 1, false));
            stack.push((merge.left, depth + 1, false));
        }
    }

    Ok(Dendrogram {
        leaf_order,
        segments,
        max_height: linkage.node_height(root),
    })
}

/// Draw the dendrogram to an SVG file, links at or below `threshold` in
/// blue, the rest in black, with a red horizontal threshold line.
#[cfg(feature = "plotting")]
pub fn render_svg(dendro: &Dendrogram, threshold: f64, path: &Path) -> MatchResult<()> {
    use plotters::prelude::*;

    let n_leaves = dendro.leaf_order.len();
    let width = (n_leaves as u32 * 24).clamp(640, 4096);
    let area = SVGBackend::new(path, (width, 768)).into_drawing_area();
    area.fill(&WHITE).map_err(render_err)?;

    let x_max = n_leaves.max(1) as f64;
    let y_max = (dendro.max_height.max(threshold) * 1.05).max(1e-9);
    let mut chart = ChartBuilder::on(&area)
        .caption("pathway clustering", ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(0.0..x_max, 0.0..y_max)
        .map_err(render_err)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("pathways")
        .y_desc("distance")
        .draw()
        .map_err(render_err)?;

    for seg in &dendro.segments {
        let color = if seg.y1.max(seg.y2) <= threshold {
            BLUE
        } else {
            BLACK
        };
        chart
            .draw_series(LineSeries::new(
                [(seg.x1, seg.y1), (seg.x2, seg.y2)],
                &color,
            ))
            .map_err(render_err)?;
    }
    chart
        .draw_series(LineSeries::new([(0.0, threshold), (x_max, threshold)], &RED))
        .map_err(render_err)?;
    area.present().map_err(render_err)?;
    Ok(())
}

#[cfg(feature = "plotting")]
fn render_err<E: std::fmt::Display>(e: E) -> MatchError {
    MatchError::Render {
        message: e.to_string(),
    }
}
