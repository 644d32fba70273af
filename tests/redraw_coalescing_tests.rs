use spectro_view::api::RedrawTopic;
use spectro_view::core::{Axis, ChannelId, FrequencyScaleMode, NormalizedPointer};
use spectro_view::interaction::{WheelInput, WheelMode};
use spectro_view::render::{DisplayOptions, Interpolation, NullRenderer};
use spectro_view::{SpectrogramViewer, ViewerConfig};

fn viewer() -> SpectrogramViewer<NullRenderer> {
    let mut viewer =
        SpectrogramViewer::new(NullRenderer::default(), ViewerConfig::default()).expect("viewer");
    // initial placeholder uploads queue a redraw for every channel
    assert_eq!(viewer.on_tick(), 4);
    viewer
}

#[test]
fn many_wheel_events_produce_one_draw_per_tick() {
    let mut viewer = viewer();
    let draws_before = viewer.renderer().draw_count;

    for _ in 0..25 {
        viewer
            .wheel(ChannelId::LeftParasagittal, WheelInput::new(0.0, -3.0).with_ctrl())
            .expect("wheel");
    }
    assert!(
        viewer
            .pending_redraw(ChannelId::LeftParasagittal)
            .contains_topic(RedrawTopic::Viewport)
    );

    assert_eq!(viewer.on_tick(), 1);
    assert_eq!(viewer.renderer().draw_count, draws_before + 1);
    assert_eq!(viewer.renderer().last_drawn, Some(ChannelId::LeftParasagittal));
    assert!(!viewer.has_pending_redraw());
    assert_eq!(viewer.on_tick(), 0);
}

#[test]
fn amplitude_wheel_marks_amplitude_topic_only() {
    let mut viewer = viewer();
    let mode = viewer
        .wheel(ChannelId::RightLateral, WheelInput::new(10.0, 0.0).with_alt())
        .expect("wheel");
    assert_eq!(mode, WheelMode::Amplitude);

    let pending = viewer.pending_redraw(ChannelId::RightLateral);
    assert!(pending.contains_topic(RedrawTopic::Amplitude));
    assert!(!pending.contains_topic(RedrawTopic::Viewport));
    assert!(viewer.pending_redraw(ChannelId::LeftLateral).is_none());
}

#[test]
fn display_change_redraws_every_channel_once() {
    let mut viewer = viewer();
    let options = DisplayOptions {
        frequency_scale: FrequencyScaleMode::Logarithmic,
        interpolation: Interpolation::Linear,
    };
    viewer.set_display_options(options);
    viewer
        .set_view_range(ChannelId::LeftLateral, Axis::Time, 0.2, 0.4)
        .expect("range");

    assert_eq!(viewer.on_tick(), 4);
    assert_eq!(viewer.display_options(), options);

    viewer.set_display_options(options);
    assert!(!viewer.has_pending_redraw());
}

#[test]
fn pointer_tracking_does_not_schedule_redraws() {
    let mut viewer = viewer();
    let readout = viewer
        .pointer_move(ChannelId::LeftLateral, NormalizedPointer::new(0.5, 0.0))
        .expect("pointer");
    assert_eq!(readout.time, 0.5);
    assert_eq!(readout.frequency, 100.0);
    assert!(
        viewer
            .cursor_label(ChannelId::LeftLateral)
            .expect("label")
            .is_some()
    );

    viewer.pointer_leave(ChannelId::LeftLateral).expect("leave");
    assert_eq!(viewer.cursor_label(ChannelId::LeftLateral).expect("label"), None);
    assert!(!viewer.has_pending_redraw());
}

#[test]
fn reset_view_restores_full_extent() {
    let mut viewer = viewer();
    viewer
        .wheel(ChannelId::LeftLateral, WheelInput::new(0.0, -50.0).with_ctrl())
        .expect("zoom");
    viewer.reset_view(ChannelId::LeftLateral).expect("reset");

    let viewport = viewer
        .channel(ChannelId::LeftLateral)
        .expect("channel")
        .viewport();
    assert_eq!(viewport.view().time, viewport.domain().time);
    assert_eq!(viewport.view().frequency, viewport.domain().frequency);

    let labels = viewer.scale_labels(ChannelId::LeftLateral).expect("labels");
    assert_eq!(labels.time_end, "0:00:01.00");
    assert_eq!(labels.frequency_high, "100 Hz");
}
