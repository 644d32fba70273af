use proptest::prelude::*;
use spectro_view::core::{AmplitudeWindow, Axis, ViewportModel};
use spectro_view::interaction::{WheelInput, WheelMode, WheelTuning, apply_wheel};

fn viewport() -> ViewportModel {
    ViewportModel::new(0.0, 1_000.0, 100.0, 1_000, 64, AmplitudeWindow::default(), 150.0)
        .expect("viewport")
}

fn wheel_input() -> impl Strategy<Value = WheelInput> {
    (
        -400.0f64..400.0,
        -400.0f64..400.0,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(delta_x, delta_y, alt, shift, ctrl)| WheelInput {
            delta_x,
            delta_y,
            alt,
            shift,
            ctrl,
        })
}

proptest! {
    #[test]
    fn view_stays_inside_domain_for_any_wheel_sequence(
        inputs in proptest::collection::vec(wheel_input(), 1..64)
    ) {
        let mut viewport = viewport();
        let tuning = WheelTuning::default();
        for input in inputs {
            apply_wheel(&mut viewport, input, &tuning).expect("finite wheel input");
            prop_assert!(viewport.view().is_within(viewport.domain()));
            let (min, max) = viewport.amplitude_window();
            prop_assert!(min >= -150.0 && max <= 150.0);
        }
    }

    #[test]
    fn zoom_in_never_widens_the_view(
        setup in proptest::collection::vec(wheel_input(), 0..16),
        delta in -400.0f64..-0.001
    ) {
        let mut viewport = viewport();
        let tuning = WheelTuning::default();
        for input in setup {
            apply_wheel(&mut viewport, input, &tuning).expect("setup");
        }
        let before = *viewport.view();

        let mode = apply_wheel(&mut viewport, WheelInput::new(0.0, delta).with_ctrl(), &tuning)
            .expect("zoom");
        prop_assert_eq!(mode, WheelMode::Zoom);
        for axis in [Axis::Time, Axis::Frequency] {
            let (old, new) = (before.width(axis), viewport.view().width(axis));
            prop_assert!(new <= old * (1.0 + 1e-12) + 1e-12, "{:?}: {} -> {}", axis, old, new);
        }
    }

    #[test]
    fn pan_preserves_view_width(
        setup in proptest::collection::vec(wheel_input(), 0..16),
        delta_x in -400.0f64..400.0,
        delta_y in -400.0f64..400.0
    ) {
        let mut viewport = viewport();
        let tuning = WheelTuning::default();
        for input in setup {
            apply_wheel(&mut viewport, input, &tuning).expect("setup");
        }
        let before = *viewport.view();

        let mode = apply_wheel(&mut viewport, WheelInput::new(delta_x, delta_y), &tuning)
            .expect("pan");
        prop_assert_eq!(mode, WheelMode::Pan);
        for axis in [Axis::Time, Axis::Frequency] {
            let (old, new) = (before.width(axis), viewport.view().width(axis));
            prop_assert!((new - old).abs() <= old * 1e-9, "{:?}: {} -> {}", axis, old, new);
        }
        prop_assert_eq!(viewport.view().amplitude, before.amplitude);
    }

    #[test]
    fn zero_delta_pan_is_a_no_op(
        setup in proptest::collection::vec(wheel_input(), 0..16)
    ) {
        let mut viewport = viewport();
        let tuning = WheelTuning::default();
        for input in setup {
            apply_wheel(&mut viewport, input, &tuning).expect("setup");
        }
        let before = *viewport.view();

        apply_wheel(&mut viewport, WheelInput::new(0.0, 0.0), &tuning).expect("pan");
        prop_assert_eq!(*viewport.view(), before);
    }
}
