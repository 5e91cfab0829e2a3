//! Background image dimension probes.
//!
//! Probes run on worker threads and report back over a channel in completion order. The UI loop
//! drains the channel and hands each [`ProbeResponse`] to [`super::PhotoGallery::apply`], which
//! drops responses for galleries that have since changed or unmounted.
use super::ProbeOutcome;
use super::ProbeRequest;
use super::ProbeTicket;
use crate::error::ProbeError;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::mpsc::Sender;
use std::thread;
use std::thread::JoinHandle;

pub const DEFAULT_PROBE_WORKERS: usize = 4;

/// Looks up the pixel size of an image.
pub trait DimensionProbe: Send + Sync {
    /// `(width, height)` in pixels.
    fn dimensions(&self, url: &str) -> Result<(u32, u32), ProbeError>;
}

impl<F> DimensionProbe for F
where
    F: Fn(&str) -> Result<(u32, u32), ProbeError> + Send + Sync,
{
    fn dimensions(&self, url: &str) -> Result<(u32, u32), ProbeError> {
        self(url)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeResponse {
    pub ticket: ProbeTicket,
    pub outcome: ProbeOutcome,
}

/// Runs one probe. Errors become [`ProbeOutcome::Failed`].
pub fn run_probe(probe: &dyn DimensionProbe, request: &ProbeRequest) -> ProbeResponse {
    let outcome = match probe.dimensions(&request.url) {
        Ok((width, height)) if width > 0 && height > 0 => ProbeOutcome::Loaded { width, height },
        Ok(_) => {
            let err = ProbeError::Empty(request.url.clone());
            tracing::debug!(error = %err, "image probe failed");
            ProbeOutcome::Failed
        }
        Err(err) => {
            tracing::debug!(url = %request.url, error = %err, "image probe failed");
            ProbeOutcome::Failed
        }
    };
    ProbeResponse {
        ticket: request.ticket,
        outcome,
    }
}

/// Probes `requests` on up to `workers` threads, sending each response to `tx`.
///
/// Workers stop early once the receiving side is gone.
pub fn spawn_probes(
    probe: Arc<dyn DimensionProbe>,
    requests: Vec<ProbeRequest>,
    tx: Sender<ProbeResponse>,
    workers: usize,
) -> Vec<JoinHandle<()>> {
    if requests.is_empty() {
        return Vec::new();
    }
    let workers = workers.clamp(1, requests.len());
    tracing::debug!(requests = requests.len(), workers, "spawning image probes");
    let queue = Arc::new(Mutex::new(VecDeque::from(requests)));

    let mut handles = Vec::with_capacity(workers);
    for i in 0..workers {
        let queue = Arc::clone(&queue);
        let probe = Arc::clone(&probe);
        let tx = tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("folio-probe-{i}"))
            .spawn(move || {
                loop {
                    let next = match queue.lock() {
                        Ok(mut queue) => queue.pop_front(),
                        Err(_) => None,
                    };
                    let Some(request) = next else {
                        break;
                    };
                    if tx.send(run_probe(probe.as_ref(), &request)).is_err() {
                        break;
                    }
                }
            });
        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => tracing::warn!(error = %err, "failed to spawn image probe worker"),
        }
    }
    handles
}

#[cfg(feature = "image")]
pub use self::file::ImageFileProbe;

#[cfg(feature = "image")]
mod file {
    use super::DimensionProbe;
    use crate::error::ProbeError;
    use std::path::Path;
    use std::path::PathBuf;

    /// Reads dimensions from image headers on the local filesystem.
    ///
    /// Accepts plain paths and `file://` URLs. Site-absolute paths (`/images/a.jpg`) and
    /// relative paths resolve against the base directory when one is set. Remote URLs are not
    /// fetched and fail, which lays the image out horizontally.
    #[derive(Clone, Debug, Default)]
    pub struct ImageFileProbe {
        base_dir: Option<PathBuf>,
    }

    impl ImageFileProbe {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
            Self {
                base_dir: Some(base_dir.into()),
            }
        }

        pub fn local_path(&self, url: &str) -> Result<PathBuf, ProbeError> {
            if let Ok(parsed) = url::Url::parse(url) {
                if parsed.scheme() != "file" {
                    return Err(ProbeError::Unsupported(url.to_string()));
                }
                return parsed
                    .to_file_path()
                    .map_err(|()| ProbeError::Unsupported(url.to_string()));
            }
            let path = Path::new(url);
            match &self.base_dir {
                Some(base) if path.is_absolute() => {
                    Ok(base.join(url.trim_start_matches(['/', '\\'])))
                }
                Some(base) => Ok(base.join(path)),
                None => Ok(path.to_path_buf()),
            }
        }
    }

    impl DimensionProbe for ImageFileProbe {
        fn dimensions(&self, url: &str) -> Result<(u32, u32), ProbeError> {
            let path = self.local_path(url)?;
            image::image_dimensions(&path).map_err(|err| ProbeError::Decode {
                url: url.to_string(),
                message: err.to_string(),
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn reads_png_dimensions() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("tall.png");
            image::RgbImage::new(3, 7).save(&path).unwrap();

            let probe = ImageFileProbe::with_base_dir(dir.path());
            assert_eq!(probe.dimensions("tall.png").unwrap(), (3, 7));
            assert_eq!(probe.dimensions("/tall.png").unwrap(), (3, 7));
        }

        #[test]
        fn remote_urls_are_unsupported() {
            let probe = ImageFileProbe::new();
            let err = probe.dimensions("https://example.com/a.jpg").unwrap_err();
            assert!(matches!(err, ProbeError::Unsupported(_)));
        }

        #[test]
        fn missing_files_fail_to_decode() {
            let dir = tempfile::tempdir().unwrap();
            let probe = ImageFileProbe::with_base_dir(dir.path());
            assert!(matches!(
                probe.dimensions("nope.jpg"),
                Err(ProbeError::Decode { .. })
            ));
        }
    }
}
