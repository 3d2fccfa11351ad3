use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use tileview_scene::{TextureHandle, TextureState};

/// Shown while a texture is pending, or in place of one that failed.
const PLACEHOLDER_RGBA: [u8; 4] = [110, 84, 60, 255];

struct Decoded {
    handle: TextureHandle,
    result: Result<image::RgbaImage, image::ImageError>,
}

/// Why a decoded image cannot become a GPU texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unusable {
    Empty,
    TooLarge { limit: u32 },
}

/// Images must be non-empty and fit the device's 2D texture limit.
fn check_dimensions(width: u32, height: u32, limit: u32) -> Result<(), Unusable> {
    if width == 0 || height == 0 {
        Err(Unusable::Empty)
    } else if width > limit || height > limit {
        Err(Unusable::TooLarge { limit })
    } else {
        Ok(())
    }
}

enum Slot<T> {
    Pending,
    Ready(T),
    Failed,
}

/// Path dedupe and per-handle load state, independent of the GPU payload.
struct TextureSlots<T> {
    by_path: HashMap<PathBuf, TextureHandle>,
    slots: Vec<Slot<T>>,
}

impl<T> TextureSlots<T> {
    fn new() -> Self {
        Self {
            by_path: HashMap::new(),
            slots: Vec::new(),
        }
    }

    /// Handle for `path`, and whether this is its first request.
    fn request(&mut self, path: &Path) -> (TextureHandle, bool) {
        if let Some(handle) = self.by_path.get(path) {
            return (*handle, false);
        }
        let handle = TextureHandle(self.slots.len() as u32);
        self.by_path.insert(path.to_path_buf(), handle);
        self.slots.push(Slot::Pending);
        (handle, true)
    }

    fn set(&mut self, handle: TextureHandle, slot: Slot<T>) {
        if let Some(current) = self.slots.get_mut(handle.0 as usize) {
            *current = slot;
        }
    }

    fn state(&self, handle: TextureHandle) -> TextureState {
        match self.slots.get(handle.0 as usize) {
            Some(Slot::Pending) => TextureState::Pending,
            Some(Slot::Ready(_)) => TextureState::Ready,
            Some(Slot::Failed) | None => TextureState::Failed,
        }
    }

    fn ready(&self, handle: TextureHandle) -> Option<&T> {
        match self.slots.get(handle.0 as usize) {
            Some(Slot::Ready(payload)) => Some(payload),
            _ => None,
        }
    }
}

/// Tile textures keyed by path, decoded off the render thread.
///
/// Each distinct path is loaded once. Until its image arrives a handle binds
/// the placeholder.
pub(crate) struct TextureCache {
    slots: TextureSlots<wgpu::BindGroup>,
    sampler: wgpu::Sampler,
    placeholder: wgpu::BindGroup,
    decoded_tx: Sender<Decoded>,
    decoded_rx: Receiver<Decoded>,
}

impl TextureCache {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, layout: &wgpu::BindGroupLayout) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tile_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let placeholder = upload(
            device,
            queue,
            layout,
            &sampler,
            "placeholder_texture",
            1,
            1,
            &PLACEHOLDER_RGBA,
        );
        let (decoded_tx, decoded_rx) = mpsc::channel();

        Self {
            slots: TextureSlots::new(),
            sampler,
            placeholder,
            decoded_tx,
            decoded_rx,
        }
    }

    /// Handle for `path`, starting a background decode on first request.
    pub fn load(&mut self, path: &Path) -> TextureHandle {
        let (handle, first) = self.slots.request(path);
        if !first {
            return handle;
        }

        let tx = self.decoded_tx.clone();
        let owned = path.to_path_buf();
        let spawned = thread::Builder::new()
            .name("texture-decode".into())
            .spawn(move || {
                let result = image::open(&owned).map(|img| img.to_rgba8());
                // The cache may be gone by the time decoding ends.
                let _ = tx.send(Decoded { handle, result });
            });

        if let Err(e) = spawned {
            tracing::warn!(path = %path.display(), "could not start texture decode: {e}");
            self.slots.set(handle, Slot::Failed);
        }
        handle
    }

    /// Upload every image decoded since the last call.
    pub fn poll(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) {
        let limit = device.limits().max_texture_dimension_2d;
        while let Ok(Decoded { handle, result }) = self.decoded_rx.try_recv() {
            let slot = match result {
                Ok(img) => {
                    let (w, h) = img.dimensions();
                    match check_dimensions(w, h, limit) {
                        Ok(()) => {
                            tracing::debug!(texture = handle.0, width = w, height = h, "texture ready");
                            Slot::Ready(upload(
                                device,
                                queue,
                                layout,
                                &self.sampler,
                                "tile_texture",
                                w,
                                h,
                                img.as_raw(),
                            ))
                        }
                        Err(reason) => {
                            tracing::warn!(
                                texture = handle.0,
                                width = w,
                                height = h,
                                ?reason,
                                "texture cannot be uploaded"
                            );
                            Slot::Failed
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(texture = handle.0, "texture decode failed: {e}");
                    Slot::Failed
                }
            };
            self.slots.set(handle, slot);
        }
    }

    pub fn state(&self, handle: TextureHandle) -> TextureState {
        self.slots.state(handle)
    }

    /// Bind group to draw `handle` with; the placeholder unless ready.
    pub fn bind_group(&self, handle: TextureHandle) -> &wgpu::BindGroup {
        self.slots.ready(handle).unwrap_or(&self.placeholder)
    }
}

#[allow(clippy::too_many_arguments)]
fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::BindGroup {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}
