use crate::AssetError;
use std::path::Path;

/// One level of the environment mip chain, RGBA f32 row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[f32; 4]>,
}

impl MipLevel {
    fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[(y * self.width + x) as usize]
    }

    /// Half-size level averaged over 2x2 blocks. Odd edges repeat the last texel.
    fn downsample(&self) -> MipLevel {
        let width = (self.width / 2).max(1);
        let height = (self.height / 2).max(1);
        let mut pixels = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let mut sum = [0.0f32; 4];
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let t = self.texel(x * 2 + dx, y * 2 + dy);
                    for c in 0..4 {
                        sum[c] += t[c];
                    }
                }
                pixels.push(sum.map(|s| s * 0.25));
            }
        }
        MipLevel {
            width,
            height,
            pixels,
        }
    }

    /// Raw bytes for texture upload.
    pub fn as_bytes(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.iter().flat_map(|c| c.to_le_bytes()))
            .collect()
    }
}

/// Equirectangular environment map with a prefiltered mip chain.
///
/// Level 0 is the source image; each following level halves both
/// dimensions down to 1x1. Rougher surfaces sample blurrier levels.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentMap {
    levels: Vec<MipLevel>,
}

impl EnvironmentMap {
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<[f32; 4]>) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::Empty);
        }
        if pixels.len() != (width as usize) * (height as usize) {
            return Err(AssetError::SizeMismatch {
                width,
                height,
                actual: pixels.len(),
            });
        }
        let mut levels = vec![MipLevel {
            width,
            height,
            pixels,
        }];
        while let Some(last) = levels.last() {
            if last.width == 1 && last.height == 1 {
                break;
            }
            let next = last.downsample();
            levels.push(next);
        }
        Ok(Self { levels })
    }

    pub fn width(&self) -> u32 {
        self.levels[0].width
    }

    pub fn height(&self) -> u32 {
        self.levels[0].height
    }

    pub fn levels(&self) -> &[MipLevel] {
        &self.levels
    }

    pub fn mip_level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    /// Mean radiance of the whole map (the 1x1 level).
    pub fn average(&self) -> [f32; 4] {
        self.levels
            .last()
            .map(|l| l.pixels[0])
            .unwrap_or([0.0; 4])
    }
}

/// Read an equirectangular HDR image from disk.
pub fn load_environment(path: impl AsRef<Path>) -> Result<EnvironmentMap, AssetError> {
    let path = path.as_ref();
    let _span = tracing::info_span!("load_environment", path = %path.display()).entered();
    let img = image::open(path)?.to_rgba32f();
    let (width, height) = img.dimensions();
    let pixels: Vec<[f32; 4]> = img
        .into_raw()
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], 1.0])
        .collect();
    let map = EnvironmentMap::from_rgba(width, height, pixels)?;
    tracing::info!(
        width,
        height,
        mips = map.mip_level_count(),
        "environment map decoded"
    );
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use image::codecs::hdr::HdrEncoder;

    fn write_hdr(path: &Path, width: usize, height: usize, value: f32) {
        let file = std::fs::File::create(path).unwrap();
        let pixels = vec![Rgb([value, value * 0.5, 0.25]); width * height];
        HdrEncoder::new(file).encode(&pixels, width, height).unwrap();
    }

    #[test]
    fn mip_chain_halves_to_one() {
        let map = EnvironmentMap::from_rgba(8, 4, vec![[1.0, 0.0, 0.0, 1.0]; 32]).unwrap();
        let sizes: Vec<(u32, u32)> = map.levels().iter().map(|l| (l.width, l.height)).collect();
        assert_eq!(sizes, vec![(8, 4), (4, 2), (2, 1), (1, 1)]);
        assert_eq!(map.mip_level_count(), 4);
    }

    #[test]
    fn downsample_averages() {
        let pixels = vec![
            [0.0, 0.0, 0.0, 1.0],
            [4.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0, 1.0],
            [4.0, 0.0, 0.0, 1.0],
        ];
        let map = EnvironmentMap::from_rgba(2, 2, pixels).unwrap();
        assert_eq!(map.average(), [2.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn odd_sizes_terminate() {
        let map = EnvironmentMap::from_rgba(5, 3, vec![[1.0; 4]; 15]).unwrap();
        let last = map.levels().last().unwrap();
        assert_eq!((last.width, last.height), (1, 1));
        assert_eq!(map.average(), [1.0; 4]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            EnvironmentMap::from_rgba(0, 4, vec![]),
            Err(AssetError::Empty)
        ));
        assert!(matches!(
            EnvironmentMap::from_rgba(2, 2, vec![[0.0; 4]; 3]),
            Err(AssetError::SizeMismatch { actual: 3, .. })
        ));
    }

    #[test]
    fn level_bytes_are_rgba_f32() {
        let map = EnvironmentMap::from_rgba(2, 1, vec![[1.0; 4]; 2]).unwrap();
        assert_eq!(map.levels()[0].as_bytes().len(), 2 * 4 * 4);
    }

    #[test]
    fn load_hdr_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.hdr");
        write_hdr(&path, 16, 8, 2.0);

        let map = load_environment(&path).unwrap();
        assert_eq!((map.width(), map.height()), (16, 8));
        assert_eq!(map.mip_level_count(), 5);
        let px = map.levels()[0].pixels[0];
        assert!((px[0] - 2.0).abs() < 0.05);
        assert_eq!(px[3], 1.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_environment(dir.path().join("nope.hdr"));
        assert!(result.is_err());
    }
}
