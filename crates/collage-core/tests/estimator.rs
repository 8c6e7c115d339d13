use collage_core::error::CollageError;
use collage_core::estimator::{column_width, estimate_column_count};
use collage_core::model::Size;

#[test]
fn three_columns_for_matching_aspect() {
    // 40 portrait photos of 400x600 on a 1200x1800 canvas: the mean photo
    // area converts back to a 400 px expected width, three columns exactly.
    let sizes = vec![Size::new(400, 600); 40];
    let count = estimate_column_count(&sizes, Size::new(1200, 1800), 0.0).unwrap();
    assert_eq!(count, 3);
    assert_eq!(column_width(1200, count), 400);
}

#[test]
fn span_probability_discount_raises_the_count() {
    let sizes = vec![Size::new(400, 600); 40];
    let with_spans = estimate_column_count(&sizes, Size::new(1200, 1800), 0.5).unwrap();
    assert!(with_spans > 3, "discounted area must narrow the columns");
}

#[test]
fn insufficient_area_is_detected_before_layout() {
    // 9 photos of 200x1080 cover only 90% of a 1200x1800 canvas
    let sizes = vec![Size::new(200, 1080); 9];
    match estimate_column_count(&sizes, Size::new(1200, 1800), 0.0) {
        Err(CollageError::InsufficientArea {
            photo_area,
            canvas_area,
        }) => {
            assert_eq!(photo_area, 1_944_000);
            assert_eq!(canvas_area, 2_160_000);
        }
        other => panic!("expected InsufficientArea, got {:?}", other),
    }
}

#[test]
fn empty_input_is_rejected() {
    assert!(matches!(
        estimate_column_count(&[], Size::new(1200, 1800), 0.0),
        Err(CollageError::Empty)
    ));
}

#[test]
fn full_span_probability_cannot_be_estimated() {
    let sizes = vec![Size::new(400, 600); 40];
    assert!(matches!(
        estimate_column_count(&sizes, Size::new(1200, 1800), 1.0),
        Err(CollageError::InvalidConfig(_))
    ));
}

#[test]
fn at_least_one_column() {
    let sizes = vec![Size::new(10_000, 10_000)];
    let count = estimate_column_count(&sizes, Size::new(100, 100), 0.0).unwrap();
    assert_eq!(count, 1);
}

#[test]
fn last_column_absorbs_the_remainder() {
    // 1000 / 3 -> width 334, columns at 0, 334, 668; the last is 332 wide
    let width = column_width(1000, 3);
    assert_eq!(width, 334);
    assert_eq!(1000 - 2 * width, 332);
}
