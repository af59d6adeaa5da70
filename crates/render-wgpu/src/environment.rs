use crossfield_assets::EnvironmentMap;

const ENV_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
const BYTES_PER_TEXEL: u32 = 16;

/// GPU copy of an environment map and the bind group that exposes it.
pub struct EnvironmentTexture {
    pub bind_group: wgpu::BindGroup,
    /// Highest sampled mip level, used to pick blur from roughness.
    pub max_mip: f32,
    pub loaded: bool,
}

pub fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("environment_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                count: None,
            },
        ],
    })
}

impl EnvironmentTexture {
    /// 1x1 black stand-in used until an HDRI finishes loading.
    pub fn placeholder(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let texture = create_texture(device, 1, 1, 1);
        write_level(queue, &texture, 0, 1, 1, &[0u8; BYTES_PER_TEXEL as usize]);
        Self {
            bind_group: bind(device, layout, &texture),
            max_mip: 0.0,
            loaded: false,
        }
    }

    /// Upload every mip level that fits the device's texture size limit.
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        map: &EnvironmentMap,
    ) -> Self {
        let limit = device.limits().max_texture_dimension_2d;
        let levels = map.levels();
        let first = levels
            .iter()
            .position(|l| l.width <= limit && l.height <= limit)
            .unwrap_or(levels.len() - 1);
        if first > 0 {
            tracing::warn!(
                width = map.width(),
                height = map.height(),
                limit,
                skipped = first,
                "environment map exceeds texture limit, dropping top mip levels"
            );
        }
        let used = &levels[first..];
        let base = &used[0];
        let texture = create_texture(device, base.width, base.height, used.len() as u32);
        for (mip, level) in used.iter().enumerate() {
            write_level(
                queue,
                &texture,
                mip as u32,
                level.width,
                level.height,
                &level.as_bytes(),
            );
        }
        tracing::debug!(
            width = base.width,
            height = base.height,
            mips = used.len(),
            "environment texture uploaded"
        );
        Self {
            bind_group: bind(device, layout, &texture),
            max_mip: (used.len() - 1) as f32,
            loaded: true,
        }
    }
}

fn create_texture(device: &wgpu::Device, width: u32, height: u32, mips: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("environment_texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: mips,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: ENV_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    })
}

fn write_level(
    queue: &wgpu::Queue,
    texture: &wgpu::Texture,
    mip_level: u32,
    width: u32,
    height: u32,
    bytes: &[u8],
) {
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture,
            mip_level,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        bytes,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(width * BYTES_PER_TEXEL),
            rows_per_image: Some(height),
        },
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
    );
}

fn bind(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &wgpu::Texture,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("environment_sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    });
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("environment_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
    })
}
