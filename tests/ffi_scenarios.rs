//! Black-box tests driving the C ABI surface end-to-end, one per scenario.
//!
//! These call straight through `pixelgrab::ffi::*` the way a C caller
//! would: opaque handles, out-parameters, explicit destroy calls. No
//! internal Rust types are touched directly.

use std::ffi::{CStr, CString};
use std::os::raw::c_int;
use std::ptr;

use pixelgrab::ffi::annotation::*;
use pixelgrab::ffi::color::*;
use pixelgrab::ffi::context::*;
use pixelgrab::ffi::image::*;
use pixelgrab::ffi::pin::*;
use pixelgrab::ffi::recorder::*;
use pixelgrab::ffi::{PixelGrabColor, PixelGrabContext, PixelGrabError, PixelGrabRecordConfig, PixelGrabShapeStyle};

fn new_context() -> *mut PixelGrabContext {
    pixelgrab_context_create()
}

#[test]
fn scenario_region_capture_inspection() {
    unsafe {
        let ctx = new_context();
        let image = pixelgrab_capture_region(ctx, 10, 10, 100, 50);
        assert!(!image.is_null());
        assert_eq!(pixelgrab_image_get_width(image), 100);
        assert_eq!(pixelgrab_image_get_height(image), 50);
        assert_eq!(pixelgrab_image_get_format(image), pixelgrab::image::PixelFormat::Bgra8);
        assert!(pixelgrab_image_get_data_size(image) > 0);
        assert!(!pixelgrab_image_get_data(image).is_null());

        // zero-sized regions are rejected outright
        assert!(pixelgrab_capture_region(ctx, 0, 0, 0, 10).is_null());

        pixelgrab_image_destroy(image);
        pixelgrab_context_destroy(ctx);
    }
}

#[test]
fn scenario_annotation_add_remove_undo_redo_chain() {
    unsafe {
        let ctx = new_context();
        let base = pixelgrab_capture_region(ctx, 0, 0, 40, 40);
        assert!(!base.is_null());

        let ann = pixelgrab_annotation_create(ctx, base);
        assert!(!ann.is_null());

        let style = PixelGrabShapeStyle { stroke_color: 0xFFFF0000, fill_color: 0, stroke_width: 2.0, filled: 0 };
        let rect_id = pixelgrab_annotation_add_rect(ann, 2, 2, 10, 10, &style);
        assert!(rect_id >= 0);
        let ellipse_id = pixelgrab_annotation_add_ellipse(ann, 20, 20, 5, 5, &style);
        assert!(ellipse_id >= 0);
        assert_ne!(rect_id, ellipse_id);

        assert_eq!(pixelgrab_annotation_can_undo(ann), 1);
        assert_eq!(pixelgrab_annotation_can_redo(ann), 0);

        // removing a shape by id is a structural edit, distinct from undo
        assert_eq!(pixelgrab_annotation_remove_shape(ann, rect_id), PixelGrabError::Ok);
        assert_eq!(pixelgrab_annotation_remove_shape(ann, rect_id), PixelGrabError::AnnotationFailed);

        assert_eq!(pixelgrab_annotation_undo(ann), PixelGrabError::Ok);
        assert_eq!(pixelgrab_annotation_can_redo(ann), 1);
        assert_eq!(pixelgrab_annotation_redo(ann), PixelGrabError::Ok);
        assert_eq!(pixelgrab_annotation_can_redo(ann), 0);

        // invalid params on every add_* entry point fail with -1, not a panic
        assert_eq!(pixelgrab_annotation_add_rect(ann, 0, 0, 0, 5, &style), -1);
        assert_eq!(pixelgrab_annotation_add_ellipse(ann, 0, 0, 0, 5, &style), -1);
        assert_eq!(pixelgrab_annotation_add_pencil(ann, ptr::null(), 1, &style), -1);

        // interleaved [x0, y0, x1, y1] ints, matching the C header's wire format
        let points: [c_int; 4] = [0, 0, 5, 5];
        let pencil_id = pixelgrab_annotation_add_pencil(ann, points.as_ptr(), 2, &style);
        assert!(pencil_id >= 0);

        let result = pixelgrab_annotation_get_result(ann);
        assert!(!result.is_null());
        assert_eq!(pixelgrab_image_get_width(result), 40);

        let exported = pixelgrab_annotation_export(ann);
        assert!(!exported.is_null());
        pixelgrab_image_destroy(exported);

        pixelgrab_annotation_destroy(ann);
        pixelgrab_image_destroy(base);
        pixelgrab_context_destroy(ctx);
    }
}

#[test]
fn scenario_pin_lifecycle() {
    unsafe {
        let ctx = new_context();
        let image = pixelgrab_capture_region(ctx, 0, 0, 16, 16);
        assert!(!image.is_null());

        let pin = pixelgrab_pin_image(ctx, image, 100, 200);
        assert!(!pin.is_null());
        assert_eq!(pixelgrab_pin_count(ctx), 1);

        let mut x: c_int = -1;
        let mut y: c_int = -1;
        assert_eq!(pixelgrab_pin_get_position(pin, &mut x, &mut y), PixelGrabError::Ok);
        assert_eq!((x, y), (100, 200));

        assert_eq!(pixelgrab_pin_set_position(pin, 5, 6), PixelGrabError::Ok);
        assert_eq!(pixelgrab_pin_get_position(pin, &mut x, &mut y), PixelGrabError::Ok);
        assert_eq!((x, y), (5, 6));

        assert_eq!(pixelgrab_pin_get_visible(pin), 1);
        assert_eq!(pixelgrab_pin_set_visible(pin, 0), PixelGrabError::Ok);
        assert_eq!(pixelgrab_pin_get_visible(pin), 0);

        assert!(!pixelgrab_pin_get_native_handle(pin).is_null());

        let dup = pixelgrab_pin_duplicate(pin, 3, 4);
        assert!(!dup.is_null());
        assert_eq!(pixelgrab_pin_count(ctx), 2);
        let mut dx: c_int = 0;
        let mut dy: c_int = 0;
        pixelgrab_pin_get_position(dup, &mut dx, &mut dy);
        assert_eq!((dx, dy), (8, 10));

        pixelgrab_pin_destroy(dup);
        assert_eq!(pixelgrab_pin_count(ctx), 1);

        pixelgrab_pin_destroy(pin);
        assert_eq!(pixelgrab_pin_count(ctx), 0);

        pixelgrab_image_destroy(image);
        pixelgrab_context_destroy(ctx);
    }
}

#[test]
fn scenario_thirty_manual_frame_recording() {
    unsafe {
        let ctx = new_context();
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let output_cstr = CString::new(output.to_str().unwrap()).unwrap();

        let config = PixelGrabRecordConfig {
            output_path: output_cstr.as_ptr(),
            region_x: 0,
            region_y: 0,
            region_width: 64,
            region_height: 48,
            fps: 30,
            bitrate: 0,
            watermark: ptr::null(),
            user_watermark: ptr::null(),
            auto_capture: 0,
            audio_source: 0,
            audio_device_id: ptr::null(),
            audio_sample_rate: 0,
            gpu_hint: 0,
        };

        let recorder = pixelgrab_recorder_create(ctx, &config);
        assert!(!recorder.is_null());
        assert_eq!(pixelgrab_recorder_start(recorder), PixelGrabError::Ok);

        for _ in 0..30 {
            let frame = pixelgrab_capture_region(ctx, 0, 0, 64, 48);
            assert!(!frame.is_null());
            assert_eq!(pixelgrab_recorder_write_frame(recorder, frame), PixelGrabError::Ok);
            pixelgrab_image_destroy(frame);
        }

        assert_eq!(pixelgrab_recorder_get_frame_count(recorder), 30);
        assert_eq!(pixelgrab_recorder_stop(recorder), PixelGrabError::Ok);
        assert!(pixelgrab_recorder_get_duration_ms(recorder) >= 0);

        pixelgrab_recorder_destroy(recorder);
        pixelgrab_context_destroy(ctx);
    }
}

#[test]
fn scenario_color_round_trip() {
    unsafe {
        let original = PixelGrabColor { r: 200, g: 100, b: 50, a: 255 };

        let mut hsv = std::mem::zeroed();
        pixelgrab_color_rgb_to_hsv(&original, &mut hsv);

        let mut round_tripped = std::mem::zeroed();
        pixelgrab_color_hsv_to_rgb(&hsv, &mut round_tripped);
        assert_eq!(round_tripped.r, original.r);
        assert_eq!(round_tripped.g, original.g);
        assert_eq!(round_tripped.b, original.b);

        let mut buf = [0 as std::os::raw::c_char; 16];
        pixelgrab_color_to_hex(&original, buf.as_mut_ptr(), buf.len() as i32, 0);
        let hex = CStr::from_ptr(buf.as_ptr()).to_str().unwrap();
        assert_eq!(hex, "#C86432");

        let hex_cstr = CString::new(hex).unwrap();
        let mut parsed = std::mem::zeroed();
        assert_eq!(pixelgrab_color_from_hex(hex_cstr.as_ptr(), &mut parsed), PixelGrabError::Ok);
        assert_eq!(parsed.r, original.r);
        assert_eq!(parsed.g, original.g);
        assert_eq!(parsed.b, original.b);
    }
}

#[test]
fn scenario_history_recording() {
    unsafe {
        let ctx = new_context();
        assert_eq!(pixelgrab_history_count(ctx), 0);

        let first = pixelgrab_capture_region(ctx, 0, 0, 30, 30);
        assert!(!first.is_null());
        let second = pixelgrab_capture_region(ctx, 5, 5, 20, 20);
        assert!(!second.is_null());

        assert_eq!(pixelgrab_history_count(ctx), 2);

        // history is newest-first: index 0 is the second (20x20) capture
        let mut entry = std::mem::zeroed();
        assert_eq!(pixelgrab_history_get_entry(ctx, 0, &mut entry), PixelGrabError::Ok);
        assert_eq!(entry.region_width, 20);
        assert_eq!(entry.region_height, 20);

        let recaptured = pixelgrab_history_recapture(ctx, entry.id);
        assert!(!recaptured.is_null());
        assert_eq!(pixelgrab_image_get_width(recaptured), 20);

        let last = pixelgrab_recapture_last(ctx);
        assert!(!last.is_null());
        assert_eq!(pixelgrab_image_get_width(last), 20);

        pixelgrab_history_clear(ctx);
        assert_eq!(pixelgrab_history_count(ctx), 0);

        pixelgrab_image_destroy(first);
        pixelgrab_image_destroy(second);
        pixelgrab_image_destroy(recaptured);
        pixelgrab_image_destroy(last);
        pixelgrab_context_destroy(ctx);
    }
}
