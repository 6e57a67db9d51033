pub mod impl_fake;
pub mod impl_image_file;
#[cfg(feature = "camera-v4l2")]
pub mod impl_v4l2;
pub mod interface;
#[cfg(any(feature = "camera-v4l2", test))]
pub mod v4l2_frame;
