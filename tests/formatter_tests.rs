use spectro_view::core::{
    AmplitudeWindow, Axis, FrequencyScaleMapper, FrequencyScaleMode, NormalizedPointer,
    ScaleLabels, ViewportModel, format_frequency, format_time,
};
use spectro_view::interaction::CursorReadout;

fn viewport() -> ViewportModel {
    ViewportModel::new(0.0, 90.0, 100.0, 900, 65, AmplitudeWindow::default(), 150.0)
        .expect("viewport")
}

#[test]
fn frequency_unit_switches_at_one_kilohertz() {
    assert_eq!(format_frequency(999.0), "999 Hz");
    assert_eq!(format_frequency(1_500.0), "1.50 kHz");
    assert_eq!(format_frequency(10_000.0), "10.0 kHz");
    assert_eq!(format_frequency(0.5), "0.50 Hz");
}

#[test]
fn time_uses_hours_minutes_and_hundredths() {
    assert_eq!(format_time(3_661.2), "1:01:01.20");
    assert_eq!(format_time(90.0), "0:01:30.00");
}

#[test]
fn time_rounding_carries_into_minutes_and_hours() {
    assert_eq!(format_time(59.996), "0:01:00.00");
    assert_eq!(format_time(3_599.999), "1:00:00.00");
    assert_eq!(format_time(59.994), "0:00:59.99");
}

#[test]
fn scale_labels_follow_visible_extent() {
    let mut viewport = viewport();
    viewport
        .set_view_range(Axis::Time, 30.0, 60.0)
        .expect("range");

    let labels = ScaleLabels::for_viewport(&viewport, FrequencyScaleMode::Linear);
    assert_eq!(labels.time_start, "0:00:30.00");
    assert_eq!(labels.time_end, "0:01:00.00");
    assert_eq!(labels.frequency_low, "0.00 Hz");
    assert_eq!(labels.frequency_high, "100 Hz");
}

#[test]
fn logarithmic_labels_start_at_one_hertz() {
    let labels = ScaleLabels::for_viewport(&viewport(), FrequencyScaleMode::Logarithmic);
    assert_eq!(labels.frequency_low, "1.00 Hz");
    assert_eq!(labels.frequency_high, "100 Hz");

    let mapper = FrequencyScaleMapper::for_viewport(&viewport(), FrequencyScaleMode::Logarithmic);
    assert_eq!(mapper.format(50.0), "10.0 Hz");
}

#[test]
fn cursor_label_combines_position_and_amplitude_band() {
    let viewport = viewport();
    let readout =
        CursorReadout::at(&viewport, NormalizedPointer::new(0.5, 0.5)).expect("readout");
    assert_eq!(
        readout.label(&viewport, FrequencyScaleMode::Linear),
        "0:00:45.00, 50.0 Hz\n0.00 dB ± 45.00 dB"
    );
}
