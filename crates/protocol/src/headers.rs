//! Header names and value builders for upload requests.

/// Remote file name the payload should be stored under.
pub const CONTENT_DISPOSITION: &str = "Content-Disposition";

/// Exact byte length of the body, declared ahead of the stream.
pub const X_FILE_SIZE: &str = "X-File-Size";

/// Marks the payload as a packed directory archive rather than a
/// literal end-user file.
pub const X_IS_ARCHIVE: &str = "X-Is-Archive";

/// Signals a headers-only negotiation request; the body follows in a
/// second request only if the server accepts this one.
pub const X_EXPECT: &str = "X-Expect";

/// Value for [`X_EXPECT`] on preflight requests.
pub const EXPECT_CONTINUE: &str = "100-continue";

/// Builds the `Content-Disposition` value for a destination path.
pub fn content_disposition(destination: &str) -> String {
    format!("attachment; filename=\"{destination}\"")
}
