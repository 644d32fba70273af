use spectro_view::core::{ChannelId, RequestWindow};
use spectro_view::protocol::{
    DataType, EncodedFrame, RequestSpan, SpectrogramRequestParams, decode,
};
use spectro_view::render::NullRenderer;
use spectro_view::{SpectrogramViewer, ViewerConfig};

fn viewer() -> SpectrogramViewer<NullRenderer> {
    SpectrogramViewer::new(NullRenderer::default(), ViewerConfig::default()).expect("viewer")
}

fn params() -> SpectrogramRequestParams {
    let window = RequestWindow::new(0.0, 0.5).expect("window");
    SpectrogramRequestParams::new(1024, window.into(), DataType::from_file_name("005.eeg"))
}

#[test]
fn file_request_emits_one_text_frame_per_channel() {
    let mut viewer = viewer();
    let frames = viewer
        .request_file_spectrogram("005", params())
        .expect("request");
    assert_eq!(frames.len(), 4);

    for (frame, channel) in frames.iter().zip(ChannelId::ALL) {
        assert!(matches!(frame, EncodedFrame::Text(_)));
        let decoded = decode(frame.as_raw()).expect("decode");
        assert_eq!(decoded.kind, "request_file_spectrogram");
        assert_eq!(decoded.content["channel"], channel.as_str());
        assert_eq!(decoded.content["sequence"], 1);
        assert_eq!(decoded.content["identifier"], "005");
        assert_eq!(decoded.content["timeRange"][1], 0.5);
        assert_eq!(decoded.content["dataType"], "eeg");
    }
}

#[test]
fn each_request_advances_sequence_and_restarts_progress() {
    let mut viewer = viewer();
    viewer
        .request_file_spectrogram("005", params())
        .expect("first");
    let frames = viewer
        .request_file_spectrogram("005", params())
        .expect("second");

    let decoded = decode(frames[2].as_raw()).expect("decode");
    assert_eq!(decoded.content["sequence"], 2);
    for channel in ChannelId::ALL {
        assert_eq!(viewer.issued_sequence(channel).expect("sequence"), 2);
        assert_eq!(viewer.channel(channel).expect("channel").progress(), 0.0);
    }
}

#[test]
fn data_request_carries_file_bytes_as_payload() {
    let mut viewer = viewer();
    let params = SpectrogramRequestParams::new(
        2048,
        RequestSpan::Duration(30.0),
        DataType::from_file_name("song.wav"),
    )
    .with_overlap(0.75);
    let frame = viewer
        .request_data_spectrogram(params, vec![0x52, 0x49, 0x46, 0x46])
        .expect("request");
    assert!(matches!(frame, EncodedFrame::Binary(_)));

    let decoded = decode(frame.as_raw()).expect("decode");
    assert_eq!(decoded.kind, "request_data_spectrogram");
    assert_eq!(decoded.content["duration"], 30.0);
    assert_eq!(decoded.content["overlap"], 0.75);
    assert_eq!(decoded.content["dataType"], "audio");
    assert_eq!(decoded.payload, Some(vec![0x52, 0x49, 0x46, 0x46]));

    assert_eq!(viewer.issued_sequence(ChannelId::LeftLateral).expect("sequence"), 1);
    assert_eq!(viewer.issued_sequence(ChannelId::RightLateral).expect("sequence"), 0);
}

#[test]
fn invalid_requests_leave_sequences_untouched() {
    let mut viewer = viewer();
    assert!(viewer.request_file_spectrogram("", params()).is_err());
    assert!(
        viewer
            .request_file_spectrogram("005", params().with_overlap(1.5))
            .is_err()
    );
    assert_eq!(viewer.issued_sequence(ChannelId::LeftLateral).expect("sequence"), 0);
}

#[test]
fn request_window_steps_through_a_recording() {
    let window = RequestWindow::new(0.0, 0.5).expect("window");
    let next = window.advance(0.5).expect("advance");
    assert_eq!((next.start, next.end), (0.5, 1.0));
    let back = next.retreat(0.5).expect("retreat");
    assert_eq!(back, window);
}
