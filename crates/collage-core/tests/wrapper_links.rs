use collage_core::error::CollageError;
use collage_core::model::Size;
use collage_core::wrapper::{WrapperArena, WrapperId};

fn linked_pair(arena: &mut WrapperArena, size: Size) -> (WrapperId, WrapperId) {
    let real = arena.insert_photo(0, size);
    let placeholder = arena.insert_placeholder(size);
    arena.link(real, placeholder);
    (real, placeholder)
}

#[test]
fn placeholder_has_no_photo() {
    let mut arena = WrapperArena::new();
    let real = arena.insert_photo(3, Size::new(800, 1200));
    let placeholder = arena.insert_placeholder(Size::new(800, 1200));
    assert_eq!(arena.get(real).photo(), Some(3));
    assert!(!arena.get(real).is_placeholder());
    assert!(arena.get(placeholder).is_placeholder());
}

#[test]
fn resize_mirrors_onto_partner() {
    let mut arena = WrapperArena::new();
    let (real, placeholder) = linked_pair(&mut arena, Size::new(1600, 2400));
    arena.resize(real, 800, 2400).unwrap();
    assert_eq!(arena.size(real), Size::new(800, 1200));
    assert_eq!(arena.size(placeholder), Size::new(800, 1200));
    assert_eq!(arena.get(real).ops(), arena.get(placeholder).ops());
}

#[test]
fn crop_mirrors_onto_partner() {
    let mut arena = WrapperArena::new();
    let (real, placeholder) = linked_pair(&mut arena, Size::new(800, 1200));
    arena.crop_to_height(real, 900).unwrap();
    assert_eq!(arena.size(real).height, 900);
    assert_eq!(arena.size(placeholder).height, 900);

    // heights stay equal when the placeholder side is cropped too
    arena.crop_to_height(placeholder, 850).unwrap();
    assert_eq!(arena.size(real).height, 850);
    assert_eq!(arena.size(placeholder).height, 850);
}

#[test]
fn cached_size_equals_op_replay() {
    let mut arena = WrapperArena::new();
    let (real, placeholder) = linked_pair(&mut arena, Size::new(1600, 2400));
    arena.resize(real, 800, 2400).unwrap();
    arena.crop_to_height(real, 1000).unwrap();
    arena.crop_to_height(placeholder, 993).unwrap();
    for id in [real, placeholder] {
        let wrapper = arena.get(id);
        assert_eq!(wrapper.replay().unwrap(), wrapper.size());
    }
}

#[test]
fn lock_propagates_and_freezes_geometry() {
    let mut arena = WrapperArena::new();
    let (real, placeholder) = linked_pair(&mut arena, Size::new(800, 1200));
    arena.lock(real);
    assert!(arena.get(real).is_locked());
    assert!(arena.get(placeholder).is_locked());

    // mutation requests on locked wrappers are ignored, not errors
    arena.resize(real, 400, 1200).unwrap();
    arena.crop_to_height(placeholder, 600).unwrap();
    assert_eq!(arena.size(real), Size::new(800, 1200));
    assert_eq!(arena.size(placeholder), Size::new(800, 1200));
    assert!(arena.get(real).ops().is_empty());
}

#[test]
fn crop_within_slack_is_a_noop() {
    let mut arena = WrapperArena::new();
    let id = arena.insert_photo(0, Size::new(800, 1200));
    // 4 px above the current height: absorbed
    arena.crop_to_height(id, 1204).unwrap();
    assert_eq!(arena.size(id).height, 1200);
    assert!(arena.get(id).ops().is_empty());
}

#[test]
fn crop_beyond_slack_is_infeasible() {
    let mut arena = WrapperArena::new();
    let id = arena.insert_photo(0, Size::new(800, 1200));
    assert!(matches!(
        arena.crop_to_height(id, 1206),
        Err(CollageError::CropExhausted {
            height: 1200,
            target: 1206
        })
    ));
}

#[test]
fn crop_to_zero_is_infeasible() {
    let mut arena = WrapperArena::new();
    let id = arena.insert_photo(0, Size::new(800, 1200));
    assert!(matches!(
        arena.crop_to_height(id, 0),
        Err(CollageError::CropExhausted { .. })
    ));
    // the failed request left no operation behind
    assert!(arena.get(id).ops().is_empty());
    assert_eq!(arena.size(id).height, 1200);
}

#[test]
fn upscale_through_arena_fails_loudly() {
    let mut arena = WrapperArena::new();
    let id = arena.insert_photo(0, Size::new(400, 600));
    assert!(matches!(
        arena.resize(id, 800, 600),
        Err(CollageError::Upscale { .. })
    ));
    assert!(arena.get(id).ops().is_empty());
}
