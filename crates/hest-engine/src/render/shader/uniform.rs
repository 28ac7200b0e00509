use bytemuck::Pod;

use super::reflect::{UniformBlock, ValueType};
use super::ShaderError;

/// A value that can be written into a uniform block member.
pub trait UniformValue: Pod {
    const TYPE: ValueType;
}

impl UniformValue for f32 {
    const TYPE: ValueType = ValueType::Float;
}

impl UniformValue for [f32; 2] {
    const TYPE: ValueType = ValueType::FloatVec2;
}

impl UniformValue for [f32; 3] {
    const TYPE: ValueType = ValueType::FloatVec3;
}

impl UniformValue for [f32; 4] {
    const TYPE: ValueType = ValueType::FloatVec4;
}

/// CPU shadow of a uniform block.
///
/// Writes are checked against the reflected member list and land at the
/// member's WGSL offset. The dirty flag tells the owner when to re-upload.
#[derive(Debug, Clone)]
pub struct UniformStorage {
    block: UniformBlock,
    data: Vec<u8>,
    dirty: bool,
}

impl UniformStorage {
    pub fn new(block: UniformBlock) -> Self {
        let data = vec![0; buffer_size(block.size) as usize];
        Self {
            block,
            data,
            dirty: true,
        }
    }

    pub fn block(&self) -> &UniformBlock {
        &self.block
    }

    pub fn set<T: UniformValue>(&mut self, name: &str, value: T) -> Result<(), ShaderError> {
        let offset = self.checked_offset::<T>(name)?;
        let bytes = bytemuck::bytes_of(&value);
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.dirty = true;
        Ok(())
    }

    pub fn get<T: UniformValue>(&self, name: &str) -> Result<T, ShaderError> {
        let offset = self.checked_offset::<T>(name)?;
        Ok(bytemuck::pod_read_unaligned(&self.data[offset..offset + std::mem::size_of::<T>()]))
    }

    /// Block contents, padded to the GPU buffer size.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns whether the block changed since the last call, and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    fn checked_offset<T: UniformValue>(&self, name: &str) -> Result<usize, ShaderError> {
        let member = self
            .block
            .member(name)
            .ok_or_else(|| ShaderError::UnknownUniform(name.to_string()))?;

        if member.ty != T::TYPE {
            return Err(ShaderError::UniformType {
                name: name.to_string(),
                declared: member.ty,
                given: T::TYPE,
            });
        }

        Ok(member.offset as usize)
    }
}

/// Size of the GPU buffer backing a block: WGSL size rounded up to 16 bytes.
pub(crate) fn buffer_size(block_size: u32) -> u64 {
    u64::from(block_size).next_multiple_of(16).max(16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::shader::ShaderUniform;

    fn storage() -> UniformStorage {
        UniformStorage::new(UniformBlock {
            size: 24,
            members: vec![
                ShaderUniform { name: "viewport_size".into(), offset: 0, ty: ValueType::FloatVec2 },
                ShaderUniform { name: "offset".into(), offset: 8, ty: ValueType::FloatVec2 },
                ShaderUniform { name: "color_factor".into(), offset: 16, ty: ValueType::Float },
                ShaderUniform { name: "zoom".into(), offset: 20, ty: ValueType::Float },
            ],
        })
    }

    #[test]
    fn buffer_is_padded_to_16_bytes() {
        assert_eq!(storage().bytes().len(), 32);
        assert_eq!(buffer_size(0), 16);
        assert_eq!(buffer_size(48), 48);
    }

    #[test]
    fn set_writes_at_member_offset() {
        let mut s = storage();
        s.set("color_factor", 0.5f32).unwrap();
        s.set("viewport_size", [1280.0f32, 756.0]).unwrap();

        let float_at = |i: usize| f32::from_ne_bytes(s.bytes()[i * 4..i * 4 + 4].try_into().unwrap());
        assert_eq!(float_at(0), 1280.0);
        assert_eq!(float_at(1), 756.0);
        assert_eq!(float_at(4), 0.5);
        assert_eq!(s.get::<f32>("color_factor").unwrap(), 0.5);
        assert_eq!(s.get::<[f32; 2]>("offset").unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let mut s = storage();
        let err = s.set("ColorFactor", 1.0f32).unwrap_err();
        assert!(matches!(err, ShaderError::UnknownUniform(ref n) if n == "ColorFactor"));
        assert_eq!(err.to_string(), "uniform `ColorFactor` not found");
    }

    #[test]
    fn mismatched_type_is_rejected() {
        let mut s = storage();
        let err = s.set("viewport_size", 1.0f32).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::UniformType { declared: ValueType::FloatVec2, given: ValueType::Float, .. }
        ));
        assert_eq!(err.to_string(), "uniform `viewport_size` is declared as vec2<f32>, value is f32");
    }

    #[test]
    fn dirty_flag_tracks_writes() {
        let mut s = storage();
        assert!(s.take_dirty());
        assert!(!s.take_dirty());

        s.set("zoom", 2.0f32).unwrap();
        assert!(s.take_dirty());

        // Failed writes leave the block untouched.
        let _ = s.set("zoom", [1.0f32, 2.0]);
        assert!(!s.take_dirty());
    }
}
