//! Connected regions of a binary mask

use crate::bbox::BBox;
use crate::mask::{BACKGROUND, FOREGROUND};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use serde::Serialize;

/// One 8-connected component of foreground pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub bbox: BBox,
    /// Pixels enclosed by the outer boundary, holes included
    pub area: u32,
    /// Foreground pixels of the component itself
    pub pixels: u32,
}

/// Labels are dense `1..=n`; slot `label - 1` holds the component.
struct Component {
    first: usize,
    bbox: BBox,
    pixels: u32,
    /// Enclosing component of the other kind, from the pixel above the first one
    parent: Option<usize>,
    touches_border: bool,
}

fn slot(components: &mut Vec<Option<Component>>, label: u32) -> &mut Option<Component> {
    let i = label as usize - 1;
    if i >= components.len() {
        components.resize_with(i + 1, || None);
    }
    &mut components[i]
}

fn label_at(labels: &ImageBuffer<Luma<u32>, Vec<u32>>, x: u32, y: u32) -> Option<usize> {
    match labels.get_pixel(x, y)[0] {
        0 => None,
        l => Some(l as usize - 1),
    }
}

/// Label 8-connected foreground regions and measure their filled area.
///
/// Background is labeled with 4-connectivity; a background component that does not
/// reach the frame edge is a hole and counts toward the region around it, along with
/// anything nested inside it. Regions are returned in raster order of their first pixel.
pub fn extract_regions(mask: &GrayImage) -> Vec<Region> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let inverted = GrayImage::from_fn(width, height, |x, y| {
        if *mask.get_pixel(x, y) == BACKGROUND { FOREGROUND } else { BACKGROUND }
    });
    let fg_labels = connected_components(mask, Connectivity::Eight, BACKGROUND);
    let bg_labels = connected_components(&inverted, Connectivity::Four, BACKGROUND);

    let mut regions: Vec<Option<Component>> = Vec::new();
    let mut holes: Vec<Option<Component>> = Vec::new();

    for (x, y, label) in fg_labels.enumerate_pixels() {
        let index = y as usize * width as usize + x as usize;
        let on_border = x == 0 || y == 0 || x == width - 1 || y == height - 1;

        let (label, table, other) = match label[0] {
            0 => (bg_labels.get_pixel(x, y)[0], &mut holes, &fg_labels),
            l => (l, &mut regions, &bg_labels),
        };

        match slot(table, label) {
            Some(c) => {
                c.bbox.include(x, y);
                c.pixels += 1;
                c.touches_border |= on_border;
            }
            empty => {
                // The pixel above a first pixel always belongs to the other kind.
                let parent = if y > 0 { label_at(other, x, y - 1) } else { None };
                *empty = Some(Component {
                    first: index,
                    bbox: BBox::new(x, y, 1, 1),
                    pixels: 1,
                    parent,
                    touches_border: on_border,
                });
            }
        }
    }

    let holes: Vec<Option<Component>> = holes
        .into_iter()
        .map(|h| h.filter(|h| !h.touches_border))
        .collect();

    // Children start later in raster order than whatever encloses them, so folding
    // from the last first-pixel backwards settles every subtree before its parent.
    enum Node {
        Region(usize),
        Hole(usize),
    }
    let mut order: Vec<(usize, Node)> = regions
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.as_ref().map(|r| (r.first, Node::Region(i))))
        .chain(
            holes
                .iter()
                .enumerate()
                .filter_map(|(i, h)| h.as_ref().map(|h| (h.first, Node::Hole(i)))),
        )
        .collect();
    order.sort_unstable_by(|a, b| b.0.cmp(&a.0));

    let mut filled: Vec<u32> = regions
        .iter()
        .map(|r| r.as_ref().map_or(0, |r| r.pixels))
        .collect();
    let mut hole_filled: Vec<u32> = holes
        .iter()
        .map(|h| h.as_ref().map_or(0, |h| h.pixels))
        .collect();

    for (_, node) in order {
        match node {
            Node::Region(i) => {
                let parent = regions[i].as_ref().and_then(|r| r.parent);
                if let Some(h) = parent.filter(|&h| holes[h].is_some()) {
                    hole_filled[h] += filled[i];
                }
            }
            Node::Hole(h) => {
                if let Some(r) = holes[h].as_ref().and_then(|h| h.parent) {
                    filled[r] += hole_filled[h];
                }
            }
        }
    }

    let mut out: Vec<(usize, Region)> = regions
        .iter()
        .zip(filled)
        .filter_map(|(r, area)| {
            r.as_ref().map(|r| {
                (
                    r.first,
                    Region {
                        bbox: r.bbox,
                        area,
                        pixels: r.pixels,
                    },
                )
            })
        })
        .collect();
    out.sort_unstable_by_key(|(first, _)| *first);
    out.into_iter().map(|(_, r)| r).collect()
}

/// The region with the largest filled area; the earliest one wins a tie.
pub fn largest_region(regions: &[Region]) -> Option<Region> {
    regions
        .iter()
        .copied()
        .reduce(|best, r| if r.area > best.area { r } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(mask: &mut GrayImage, x: u32, y: u32, w: u32, h: u32, value: Luma<u8>) {
        for yy in y..y + h {
            for xx in x..x + w {
                mask.put_pixel(xx, yy, value);
            }
        }
    }

    fn solid(bbox: BBox) -> Region {
        let n = bbox.width * bbox.height;
        Region { bbox, area: n, pixels: n }
    }

    #[test]
    fn test_empty_mask_has_no_regions() {
        let mask = GrayImage::new(16, 16);
        assert!(extract_regions(&mask).is_empty());
        assert!(extract_regions(&GrayImage::new(0, 0)).is_empty());
        assert_eq!(largest_region(&[]), None);
    }

    #[test]
    fn test_disjoint_rectangles() {
        let mut mask = GrayImage::new(40, 30);
        fill(&mut mask, 2, 3, 4, 5, FOREGROUND);
        fill(&mut mask, 20, 10, 10, 10, FOREGROUND);

        let regions = extract_regions(&mask);
        assert_eq!(regions, [solid(BBox::new(2, 3, 4, 5)), solid(BBox::new(20, 10, 10, 10))]);
        assert_eq!(largest_region(&regions).map(|r| r.area), Some(100));
    }

    #[test]
    fn test_diagonal_neighbors_join() {
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(0, 0, FOREGROUND);
        mask.put_pixel(1, 1, FOREGROUND);
        mask.put_pixel(2, 2, FOREGROUND);

        let regions = extract_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].bbox, BBox::new(0, 0, 3, 3));
        assert_eq!(regions[0].area, 3);
    }

    #[test]
    fn test_hole_counts_toward_area() {
        let mut mask = GrayImage::new(50, 50);
        fill(&mut mask, 10, 10, 30, 30, FOREGROUND);
        fill(&mut mask, 15, 15, 20, 20, BACKGROUND);

        let regions = extract_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].pixels, 500);
        assert_eq!(regions[0].area, 900);
        assert_eq!(regions[0].bbox, BBox::new(10, 10, 30, 30));
    }

    #[test]
    fn test_ring_filling_the_frame() {
        let mut mask = GrayImage::new(10, 10);
        fill(&mut mask, 0, 0, 10, 10, FOREGROUND);
        fill(&mut mask, 3, 3, 4, 4, BACKGROUND);

        let regions = extract_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].pixels, regions[0].area), (84, 100));
    }

    #[test]
    fn test_open_notch_is_not_a_hole() {
        // U shape: the gap reaches the outside through the top edge of the shape
        let mut mask = GrayImage::new(20, 20);
        fill(&mut mask, 2, 2, 10, 10, FOREGROUND);
        fill(&mut mask, 5, 2, 4, 6, BACKGROUND);

        let regions = extract_regions(&mask);
        assert_eq!(regions[0].pixels, 76);
        assert_eq!(regions[0].area, 76);
    }

    #[test]
    fn test_diagonal_gap_does_not_leak_a_hole() {
        // 8-connected diamond ring; its interior touches the outside only diagonally
        let mut mask = GrayImage::new(7, 7);
        for (x, y) in [(3, 1), (2, 2), (4, 2), (1, 3), (5, 3), (2, 4), (4, 4), (3, 5)] {
            mask.put_pixel(x, y, FOREGROUND);
        }

        let regions = extract_regions(&mask);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].pixels, 8);
        assert_eq!(regions[0].area, 13);
    }

    #[test]
    fn test_nested_region_counts_toward_outer_area() {
        let mut mask = GrayImage::new(40, 40);
        fill(&mut mask, 5, 5, 30, 30, FOREGROUND);
        fill(&mut mask, 8, 8, 24, 24, BACKGROUND);
        fill(&mut mask, 15, 15, 6, 6, FOREGROUND);

        let regions = extract_regions(&mask);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].bbox, BBox::new(5, 5, 30, 30));
        assert_eq!(regions[0].area, 900);
        assert_eq!(regions[1], solid(BBox::new(15, 15, 6, 6)));
    }

    #[test]
    fn test_tie_keeps_first_region() {
        let mut mask = GrayImage::new(20, 5);
        fill(&mut mask, 0, 0, 3, 3, FOREGROUND);
        fill(&mut mask, 10, 0, 3, 3, FOREGROUND);

        let regions = extract_regions(&mask);
        assert_eq!(largest_region(&regions).map(|r| r.bbox.x), Some(0));
    }
}
