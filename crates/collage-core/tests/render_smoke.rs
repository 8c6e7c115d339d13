use collage_core::config::CollageConfig;
use collage_core::pipeline::{InputPhoto, render_collage};
use image::{DynamicImage, Rgba, RgbaImage};

fn flat_photo(key: &str, w: u32, h: u32, color: [u8; 4]) -> InputPhoto {
    InputPhoto {
        key: key.to_string(),
        image: DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(color))),
    }
}

#[test]
fn four_photos_compose_a_full_canvas() {
    let cfg = CollageConfig {
        canvas_width: 40,
        canvas_height: 60,
        span_probability: 0.0,
        similar_height_tolerance: 10,
        seed: 0,
        columns: Some(2),
    };
    let photos = vec![
        flat_photo("red", 80, 120, [255, 0, 0, 255]),
        flat_photo("green", 80, 120, [0, 255, 0, 255]),
        flat_photo("blue", 80, 120, [0, 0, 255, 255]),
        flat_photo("white", 80, 120, [255, 255, 255, 255]),
    ];
    let out = render_collage(&photos, &cfg).unwrap();

    assert_eq!(out.rgba.dimensions(), (40, 60));
    assert_eq!(out.plan.items.len(), 4);

    // every planned tile stays inside the canvas
    for item in &out.plan.items {
        assert!(item.position.x + item.size.width <= 40);
        assert!(item.position.y + item.size.height <= 60);
    }

    // round-robin placement: photos 0/2 stack in the left column, 1/3 in
    // the right; resampling a flat color keeps it flat
    assert_eq!(out.rgba.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    assert_eq!(out.rgba.get_pixel(20, 0), &Rgba([0, 255, 0, 255]));
    assert_eq!(out.rgba.get_pixel(0, 30), &Rgba([0, 0, 255, 255]));
    assert_eq!(out.rgba.get_pixel(20, 30), &Rgba([255, 255, 255, 255]));
    assert_eq!(out.rgba.get_pixel(39, 59), &Rgba([255, 255, 255, 255]));
}

#[test]
fn render_matches_planned_sizes() {
    let cfg = CollageConfig {
        canvas_width: 40,
        canvas_height: 60,
        span_probability: 0.0,
        similar_height_tolerance: 10,
        seed: 0,
        columns: Some(2),
    };
    let photos = vec![
        flat_photo("a", 80, 120, [10, 20, 30, 255]),
        flat_photo("b", 80, 120, [40, 50, 60, 255]),
        flat_photo("c", 80, 120, [70, 80, 90, 255]),
        flat_photo("d", 80, 120, [100, 110, 120, 255]),
    ];
    let out = render_collage(&photos, &cfg).unwrap();

    // each column sums to the exact canvas height
    for x in [0, 20] {
        let total: u32 = out
            .plan
            .items
            .iter()
            .filter(|it| it.position.x == x)
            .map(|it| it.size.height)
            .sum();
        assert_eq!(total, 60);
    }
}
