use crate::AssetError;
use crate::environment::{EnvironmentMap, load_environment};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// Loads an environment map on a worker thread.
///
/// Poll [`EnvironmentLoader::try_take`] once per frame; it yields the result
/// exactly once.
pub struct EnvironmentLoader {
    path: PathBuf,
    receiver: Receiver<Result<EnvironmentMap, AssetError>>,
    finished: bool,
}

impl EnvironmentLoader {
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let worker_tx = tx.clone();
        let worker_path = path.clone();
        let spawned = thread::Builder::new()
            .name("hdri-loader".into())
            .spawn(move || {
                let _ = worker_tx.send(load_environment(&worker_path));
            });
        if let Err(e) = spawned {
            let _ = tx.send(Err(AssetError::Io(e)));
        }
        tracing::debug!(path = %path.display(), "environment load started");
        Self {
            path,
            receiver: rx,
            finished: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Non-blocking. `None` while loading and after the result was taken.
    pub fn try_take(&mut self) -> Option<Result<EnvironmentMap, AssetError>> {
        if self.finished {
            return None;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.finished = true;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.finished = true;
                Some(Err(AssetError::LoaderDisconnected))
            }
        }
    }

    /// Block until the worker finishes.
    pub fn wait(self) -> Result<EnvironmentMap, AssetError> {
        self.receiver
            .recv()
            .map_err(|_| AssetError::LoaderDisconnected)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn poll(loader: &mut EnvironmentLoader) -> Result<EnvironmentMap, AssetError> {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            if let Some(result) = loader.try_take() {
                return result;
            }
            assert!(Instant::now() < deadline, "loader timed out");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn failure_is_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut loader = EnvironmentLoader::spawn(dir.path().join("missing.hdr"));
        assert!(poll(&mut loader).is_err());
        assert!(loader.is_finished());
        assert!(loader.try_take().is_none());
    }

    #[test]
    fn wait_returns_decoded_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sky.hdr");
        let file = std::fs::File::create(&path).unwrap();
        let pixels = vec![image::Rgb([0.5f32, 0.5, 0.5]); 4 * 2];
        image::codecs::hdr::HdrEncoder::new(file)
            .encode(&pixels, 4, 2)
            .unwrap();

        let loader = EnvironmentLoader::spawn(&path);
        assert_eq!(loader.path(), path.as_path());
        let map = loader.wait().unwrap();
        assert_eq!((map.width(), map.height()), (4, 2));
    }
}
