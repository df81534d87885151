// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Frame-by-frame scenarios driven through `Session::process_frame`.

use approx::assert_relative_eq;
use blockhand_core::{
    BlockStore, CameraFacing, EngineConfig, GridCell, GuideMessage, HandLandmarks, MemoryStore,
    Mode, Rgb, SceneEvent, Session, LANDMARK_COUNT,
};
use nalgebra::Point2;

const SLOT: &str = "myARBlocks";

/// Hand with the wrist at (0.5, 0.8) and a hand size of 0.2.
fn hand(thumb: (f64, f64), index: (f64, f64), middle: (f64, f64)) -> HandLandmarks {
    let mut points = [Point2::new(0.5, 0.7); LANDMARK_COUNT];
    points[0] = Point2::new(0.5, 0.8);
    points[9] = Point2::new(0.5, 0.6);
    points[5] = Point2::new(0.45, 0.62);
    points[4] = Point2::new(thumb.0, thumb.1);
    points[8] = Point2::new(index.0, index.1);
    points[12] = Point2::new(middle.0, middle.1);
    HandLandmarks::new(points).unwrap()
}

fn translated(hand: &HandLandmarks, dx: f64, dy: f64) -> HandLandmarks {
    let mut points = *hand.points();
    for p in points.iter_mut() {
        p.x += dx;
        p.y += dy;
    }
    HandLandmarks::new(points).unwrap()
}

/// Pointing pose with the index tip at `tip`.
fn pointing_at(tip: (f64, f64)) -> HandLandmarks {
    let base = hand((0.46, 0.64), (0.45, 0.4), (0.55, 0.62));
    translated(&base, tip.0 - 0.45, tip.1 - 0.4)
}

fn rotate_hand() -> HandLandmarks {
    hand((0.40, 0.66), (0.50, 0.40), (0.52, 0.41))
}

fn scale_hand() -> HandLandmarks {
    hand((0.25, 0.62), (0.45, 0.4), (0.55, 0.62))
}

/// Fingertip position whose pointer ray, from the default front-facing view,
/// passes through world `(x, y, depth)`.
fn tip_toward(x: f64, y: f64, depth: f64) -> (f64, f64) {
    let config = EngineConfig::default();
    let half_height = (config.fov_degrees.to_radians() / 2.0).tan();
    let half_width = half_height * (640.0 / 480.0);
    let distance = config.camera_radius - depth;
    let ndc_x = x / (half_width * distance);
    let ndc_y = y / (half_height * distance);
    // front camera is mirrored
    ((1.0 - ndc_x) / 2.0, (1.0 - ndc_y) / 2.0)
}

fn unsmoothed() -> EngineConfig {
    EngineConfig {
        smoothing: 1.0,
        ..EngineConfig::default()
    }
}

fn stored(cells: &[(i32, i32, i32)]) -> MemoryStore {
    let records: Vec<String> = cells
        .iter()
        .map(|(x, y, z)| {
            format!(
                r#"{{"x": {}, "y": {}, "z": {}, "color": 16724787}}"#,
                x * 2,
                y * 2,
                z * 2
            )
        })
        .collect();
    let mut store = MemoryStore::new();
    store.save(SLOT, &format!("[{}]", records.join(","))).unwrap();
    store
}

fn added(events: &[SceneEvent]) -> Vec<GridCell> {
    events
        .iter()
        .filter_map(|e| match e {
            SceneEvent::BlockAdded { cell, .. } => Some(*cell),
            _ => None,
        })
        .collect()
}

fn removed(events: &[SceneEvent]) -> Vec<GridCell> {
    events
        .iter()
        .filter_map(|e| match e {
            SceneEvent::BlockRemoved { cell, .. } => Some(*cell),
            _ => None,
        })
        .collect()
}

#[test]
fn first_block_lands_after_a_full_dwell() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    let hand = pointing_at((0.5, 0.5));

    for i in 0..50 {
        let frame = session.process_frame(Some(&hand), (i * 16) as f64);
        assert_eq!(frame.mode, Mode::FirstPlacement);
        assert_eq!(frame.guide, GuideMessage::FirstPlacement);
        assert!(frame.events.is_empty(), "placed early at frame {i}");
        assert!(frame.flash.is_none());
        assert_eq!(frame.preview.as_ref().map(|p| p.opacity), Some(0.5));
    }

    let frame = session.process_frame(Some(&hand), 800.0);
    assert_eq!(added(&frame.events), vec![GridCell::new(0, 0, 0)]);
    assert!(frame.flash.is_some());
    assert_eq!(frame.preview.map(|p| p.opacity), Some(0.9));
    assert_eq!(frame.block_count, 1);

    let saved = session.store().get(SLOT).unwrap();
    assert!(saved.contains("\"color\":16724787"));
}

#[test]
fn holding_still_stacks_toward_the_camera_once_per_dwell() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    let hand = pointing_at((0.5, 0.5));

    let mut cells = Vec::new();
    for i in 0..=170 {
        let frame = session.process_frame(Some(&hand), (i * 10) as f64);
        cells.extend(added(&frame.events));
    }

    // first block at 800 ms; the next hover starts at 810 on its front face
    assert_eq!(cells, vec![GridCell::new(0, 0, 0), GridCell::new(0, 0, 1)]);
    assert_eq!(session.blocks().len(), 2);
}

#[test]
fn deletion_needs_a_fresh_dwell_on_each_block() {
    let store = stored(&[(0, 0, 0), (4, 0, 0)]);
    let mut session = Session::new(unsmoothed(), store).unwrap();
    session.set_eraser(true);
    assert_eq!(session.blocks().len(), 2);

    let on_a = pointing_at(tip_toward(0.0, 0.0, 1.0));
    let on_b = pointing_at(tip_toward(8.0, 0.0, 1.0));

    for i in 0..=20 {
        let frame = session.process_frame(Some(&on_a), (i * 20) as f64);
        assert_eq!(frame.mode, Mode::Erase);
        assert_eq!(frame.delete_highlight.map(|h| h.cell), Some(GridCell::new(0, 0, 0)));
        assert!(frame.events.is_empty());
    }

    // 400 ms on A, then over to B: nothing fires until B has had 800 ms
    for i in 21..=60 {
        let frame = session.process_frame(Some(&on_b), (i * 20) as f64);
        assert!(frame.events.is_empty(), "removed early at {} ms", i * 20);
        assert_eq!(frame.delete_highlight.map(|h| h.cell), Some(GridCell::new(4, 0, 0)));
        assert_eq!(frame.ring.map(|r| r.color), Some("#ffaaaa".to_string()));
    }

    let frame = session.process_frame(Some(&on_b), 1220.0);
    assert_eq!(removed(&frame.events), vec![GridCell::new(4, 0, 0)]);
    assert_eq!(session.blocks().len(), 1);
    assert!(session.blocks().contains_cell(GridCell::new(0, 0, 0)));

    // nothing left under the pointer
    let frame = session.process_frame(Some(&on_b), 1240.0);
    assert!(frame.events.is_empty());
    assert!(frame.ring.is_none());

    let saved = session.store().get(SLOT).unwrap();
    assert_eq!(saved.matches("color").count(), 1);
}

/// Holds the pointer on the front face of a stored block, flips the eraser
/// at 500 ms and reports the times at which blocks were added.
fn install_hold_with_eraser_flip(frame_while_erasing: bool) -> Vec<u32> {
    let mut session = Session::new(unsmoothed(), stored(&[(0, 0, 0)])).unwrap();
    let hand = pointing_at(tip_toward(0.0, 0.0, 1.0));
    let mut added_at = Vec::new();

    for t in (0..=1400).step_by(16) {
        if t == 512 {
            session.set_eraser(true);
            if frame_while_erasing {
                let frame = session.process_frame(Some(&hand), 504.0);
                assert_eq!(frame.mode, Mode::Erase);
                assert!(frame.delete_highlight.is_some());
            }
            session.set_eraser(false);
        }
        let frame = session.process_frame(Some(&hand), t as f64);
        if !added(&frame.events).is_empty() {
            added_at.push(t);
        }
    }
    added_at
}

#[test]
fn toggling_the_eraser_mid_hold_restarts_the_dwell() {
    // the install hover that began at 0 would have fired at 800
    assert_eq!(install_hold_with_eraser_flip(true), vec![1312]);
    assert_eq!(install_hold_with_eraser_flip(false), vec![1312]);
}

#[test]
fn losing_the_hand_abandons_the_hover() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    let hand = pointing_at((0.5, 0.5));

    for t in [0.0, 250.0, 500.0] {
        session.process_frame(Some(&hand), t);
    }
    let frame = session.process_frame(None, 520.0);
    assert_eq!(frame.mode, Mode::Idle);
    assert_eq!(frame.guide, GuideMessage::Start);
    assert!(frame.skeleton.is_none());

    for t in [540.0, 900.0, 1300.0] {
        let frame = session.process_frame(Some(&hand), t);
        assert!(frame.events.is_empty());
    }
    let frame = session.process_frame(Some(&hand), 1340.0);
    assert_eq!(added(&frame.events).len(), 1);

    let frame = session.process_frame(None, 1360.0);
    assert_eq!(frame.guide, GuideMessage::Idle);
}

#[test]
fn view_gestures_wait_for_a_structure() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    let before = *session.view();

    for (i, dx) in [0.0, 0.05, 0.1].into_iter().enumerate() {
        let frame = session.process_frame(Some(&translated(&rotate_hand(), dx, 0.0)), i as f64);
        assert_eq!(frame.mode, Mode::Idle);
        assert_eq!(frame.guide, GuideMessage::Start);
    }
    assert_eq!(*session.view(), before);
}

#[test]
fn eraser_on_an_empty_structure_does_nothing() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    session.set_eraser(true);
    let hand = pointing_at((0.5, 0.5));
    for i in 0..100 {
        let frame = session.process_frame(Some(&hand), (i * 20) as f64);
        assert_eq!(frame.mode, Mode::Idle);
        assert!(frame.events.is_empty());
    }
    assert!(session.blocks().is_empty());
}

#[test]
fn rotate_orbits_without_touching_the_dwell() {
    let mut session = Session::new(EngineConfig::default(), stored(&[(0, 0, 0)])).unwrap();

    let frame = session.process_frame(Some(&rotate_hand()), 0.0);
    assert_eq!(frame.mode, Mode::Rotate);
    assert!(frame.ring.is_none());
    assert_relative_eq!(session.view().theta, 0.0);

    let frame = session.process_frame(Some(&translated(&rotate_hand(), 0.05, 0.0)), 16.0);
    // 0.05 * speed 4 * 2, front camera mirrored
    assert_relative_eq!(session.view().theta, 0.4, epsilon = 1e-9);
    assert_relative_eq!(frame.camera.position[0], 40.0 * 0.4_f64.sin(), epsilon = 1e-9);
    assert_eq!(frame.guide, GuideMessage::Rotate);
}

#[test]
fn scale_follows_the_pinch_and_reports_percent() {
    let mut session = Session::new(EngineConfig::default(), stored(&[(0, 0, 0)])).unwrap();
    let base = scale_hand();

    session.process_frame(Some(&base), 0.0);
    let wider = base.scaled_about(Point2::new(0.5, 0.6), 1.5);
    let frame = session.process_frame(Some(&wider), 16.0);

    assert_eq!(frame.mode, Mode::Scale);
    assert_relative_eq!(frame.scale, 1.5, epsilon = 1e-9);
    assert_eq!(frame.guide, GuideMessage::Scale { percent: 150 });
}

#[test]
fn switching_cameras_resets_the_view() {
    let mut session = Session::new(EngineConfig::default(), stored(&[(0, 0, 0)])).unwrap();
    session.process_frame(Some(&rotate_hand()), 0.0);
    session.process_frame(Some(&translated(&rotate_hand(), 0.1, 0.0)), 16.0);
    assert!(session.view().theta.abs() > 0.1);

    assert_eq!(session.toggle_camera(), CameraFacing::Rear);
    assert_relative_eq!(session.view().theta, 0.0);

    // the next rotate frame only re-captures the baseline
    let frame = session.process_frame(Some(&translated(&rotate_hand(), 0.2, 0.0)), 32.0);
    assert_relative_eq!(session.view().theta, 0.0);
    assert_relative_eq!(frame.camera.position[2], 40.0, epsilon = 1e-9);

    // rear camera is not mirrored, so the same motion orbits the other way
    session.process_frame(Some(&translated(&rotate_hand(), 0.25, 0.0)), 48.0);
    assert_relative_eq!(session.view().theta, -0.4, epsilon = 1e-9);
}

#[test]
fn clear_all_wipes_blocks_storage_and_view() {
    let store = stored(&[(0, 0, 0), (1, 0, 0)]);
    let mut session = Session::new(EngineConfig::default(), store).unwrap();
    let base = scale_hand();
    session.process_frame(Some(&base), 0.0);
    session.process_frame(Some(&base.scaled_about(Point2::new(0.5, 0.6), 2.0)), 16.0);
    assert!(session.view().scale > 1.0);

    let events = session.clear_all();
    assert_eq!(events, vec![SceneEvent::Cleared]);
    assert!(session.blocks().is_empty());
    assert!(session.store().get(SLOT).is_none());
    assert_relative_eq!(session.view().scale, 1.0);
}

#[test]
fn placed_blocks_use_the_selected_color() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    session.set_color(Rgb::new(0x3366FF));
    let hand = pointing_at((0.5, 0.5));
    session.process_frame(Some(&hand), 0.0);
    let frame = session.process_frame(Some(&hand), 800.0);

    match frame.events.as_slice() {
        [SceneEvent::BlockAdded { color, .. }] => assert_eq!(*color, 0x3366FF),
        other => panic!("unexpected events {other:?}"),
    }
}

#[test]
fn restores_and_dedupes_stored_blocks() {
    let session = Session::new(EngineConfig::default(), stored(&[(0, 0, 0), (0, 0, 0), (2, 1, -1)]))
        .unwrap();
    assert_eq!(session.blocks().len(), 2);
    assert!(session.blocks().contains_cell(GridCell::new(2, 1, -1)));
}

#[test]
fn invalid_config_is_rejected() {
    let config = EngineConfig {
        cell_size: 0.0,
        ..EngineConfig::default()
    };
    assert!(Session::new(config, MemoryStore::new()).is_err());
}

#[test]
fn frame_output_serializes_for_the_front_end() {
    let mut session = Session::new(EngineConfig::default(), MemoryStore::new()).unwrap();
    let frame = session.process_frame(Some(&pointing_at((0.5, 0.5))), 0.0);
    let json = serde_json::to_value(&frame).unwrap();

    assert_eq!(json["mode"], "firstPlacement");
    assert_eq!(json["guide"]["kind"], "firstPlacement");
    assert!(json["guideText"].as_str().unwrap().contains("first block"));
    assert_eq!(json["skeleton"]["points"].as_array().unwrap().len(), LANDMARK_COUNT);
    assert_eq!(json["blockCount"], 0);
}
