//! Background photo decoding.
//!
//! A small worker pool decodes photos off the main thread; results are
//! marshalled back to the GTK main loop over an async channel, where the
//! caller turns them into textures and applies them to the session.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gdk4::{MemoryFormat, MemoryTexture, Texture};
use gtk4::prelude::*;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config;
use crate::image_loader;

/// A finished decode, ready for texture upload on the main thread.
pub struct DecodedPhoto {
    pub path: PathBuf,
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub orig_width: u32,
    pub orig_height: u32,
}

pub struct DecodeQueue {
    request_tx: flume::Sender<PathBuf>,
    // Paths queued or currently decoding, to avoid duplicate work.
    pending: Arc<Mutex<HashSet<PathBuf>>>,
}

impl DecodeQueue {
    /// Spawns the worker pool. `on_decoded` runs on the main loop for every
    /// successful decode.
    pub fn new<F>(on_decoded: F) -> Self
    where
        F: Fn(DecodedPhoto) + 'static,
    {
        let (request_tx, request_rx) = flume::unbounded::<PathBuf>();
        let (result_tx, result_rx) = async_channel::unbounded::<DecodedPhoto>();
        let pending: Arc<Mutex<HashSet<PathBuf>>> = Arc::new(Mutex::new(HashSet::new()));

        glib::spawn_future_local(async move {
            while let Ok(decoded) = result_rx.recv().await {
                on_decoded(decoded);
            }
        });

        for _ in 0..*config::DECODE_WORKERS {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let pending = pending.clone();
            std::thread::spawn(move || {
                while let Ok(path) = rx.recv() {
                    let decoded = image_loader::decode_rgba_scaled(&path, *config::DECODE_MAX_SIZE);
                    pending.lock().remove(&path);
                    match decoded {
                        Ok((rgba, width, height, orig_width, orig_height)) => {
                            let _ = tx.send_blocking(DecodedPhoto {
                                path,
                                rgba,
                                width,
                                height,
                                orig_width,
                                orig_height,
                            });
                        }
                        Err(err) => {
                            warn!(?path, %err, "decode failed");
                        }
                    }
                }
            });
        }

        debug!(workers = *config::DECODE_WORKERS, "decode queue started");
        Self {
            request_tx,
            pending,
        }
    }

    /// Queues a decode unless one is already in flight for this path.
    pub fn request(&self, path: &Path) {
        let mut pending = self.pending.lock();
        if pending.contains(path) {
            return;
        }
        if self.request_tx.send(path.to_path_buf()).is_ok() {
            pending.insert(path.to_path_buf());
        }
    }
}

/// Creates a GDK texture from raw RGBA data.
pub fn texture_from_rgba(data: &[u8], width: u32, height: u32) -> Option<Texture> {
    if width == 0 || height == 0 {
        return None;
    }
    let expected = (width as u64).saturating_mul(height as u64).saturating_mul(4);
    if (data.len() as u64) < expected {
        warn!(
            "skipping texture: data too small ({} bytes for {}x{})",
            data.len(),
            width,
            height
        );
        return None;
    }
    let bytes = glib::Bytes::from(data);
    let texture = MemoryTexture::new(
        width as i32,
        height as i32,
        MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    Some(texture.upcast())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_rejects_undersized_buffers() {
        assert!(texture_from_rgba(&[0u8; 4], 2, 2).is_none());
        assert!(texture_from_rgba(&[0u8; 16], 0, 2).is_none());
    }

    #[test]
    fn texture_accepts_exact_buffers() {
        let texture = texture_from_rgba(&[0u8; 16], 2, 2).expect("texture");
        assert_eq!(texture.width(), 2);
        assert_eq!(texture.height(), 2);
    }
}
