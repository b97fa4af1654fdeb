use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};
use std::collections::HashMap;
use crate::detection::preprocessing::BACKGROUND;
use crate::models::Region;

/// Find the 8-connected foreground regions of a binary mask.
///
/// Regions come back in discovery order: the order in which a row-major
/// scan first touches each one.
pub fn find_regions(mask: &GrayImage) -> Vec<Region> {
    // connected_components cannot label a single-pixel image.
    if mask.dimensions() == (1, 1) {
        if mask.get_pixel(0, 0)[0] == BACKGROUND {
            return Vec::new();
        }
        return vec![Region {
            label: 1,
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            pixel_count: 1,
        }];
    }

    let labeled = connected_components(mask, Connectivity::Eight, Luma([BACKGROUND]));

    let mut index_of: HashMap<u32, usize> = HashMap::new();
    let mut regions: Vec<Region> = Vec::new();

    for (x, y, label) in labeled.enumerate_pixels() {
        let label_val = label[0];
        if label_val == 0 {
            continue; // Skip background
        }

        match index_of.get(&label_val) {
            Some(&idx) => {
                let region = &mut regions[idx];
                region.min_x = region.min_x.min(x);
                region.min_y = region.min_y.min(y);
                region.max_x = region.max_x.max(x);
                region.max_y = region.max_y.max(y);
                region.pixel_count += 1;
            }
            None => {
                index_of.insert(label_val, regions.len());
                regions.push(Region {
                    label: label_val,
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    pixel_count: 1,
                });
            }
        }
    }

    regions
}

/// Pick the region with the largest area.
///
/// Only a strictly larger area replaces the current winner, so among
/// equal areas the first discovered wins. No regions gives the empty region.
pub fn largest_region(regions: &[Region]) -> Region {
    let mut best = Region::empty();
    for region in regions {
        if region.area() > best.area() {
            best = region.clone();
        }
    }
    best
}
