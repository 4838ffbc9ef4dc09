use crate::{Error, Result};

/// Number of addressable memory cells.
pub const MEMORY_SIZE: usize = 256;

/// Flat, zero-initialised machine memory.
#[derive(Clone)]
pub struct Ram {
    cells: [u8; MEMORY_SIZE],
}

impl Ram {
    pub fn new() -> Self {
        Self {
            cells: [0; MEMORY_SIZE],
        }
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        self.cells
            .get(addr as usize)
            .copied()
            .ok_or(Error::AddressOutOfBounds(addr))
    }

    pub fn write(&mut self, addr: u16, value: u8) -> Result<()> {
        let cell = self
            .cells
            .get_mut(addr as usize)
            .ok_or(Error::AddressOutOfBounds(addr))?;
        *cell = value;
        Ok(())
    }

    /// Copy `image` to address 0 and clear everything after it. Memory is
    /// left untouched if the image does not fit.
    pub fn load(&mut self, image: &[u8]) -> Result<()> {
        if image.len() > MEMORY_SIZE {
            return Err(Error::ProgramTooLarge {
                len: image.len(),
                capacity: MEMORY_SIZE,
            });
        }
        self.cells[..image.len()].copy_from_slice(image);
        self.cells[image.len()..].fill(0);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Ram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_edges() {
        let mut ram = Ram::new();
        ram.write(0, 0xAA).unwrap();
        ram.write(255, 0x55).unwrap();
        assert_eq!(ram.read(0).unwrap(), 0xAA);
        assert_eq!(ram.read(255).unwrap(), 0x55);
        assert!(matches!(ram.read(256), Err(Error::AddressOutOfBounds(256))));
        assert!(matches!(
            ram.write(0x1234, 1),
            Err(Error::AddressOutOfBounds(0x1234))
        ));
    }

    #[test]
    fn load_clears_previous_image() {
        let mut ram = Ram::new();
        ram.load(&[1, 2, 3, 4]).unwrap();
        ram.load(&[9]).unwrap();
        assert_eq!(&ram.as_slice()[..4], &[9, 0, 0, 0]);
    }

    #[test]
    fn load_rejects_oversized_image() {
        let mut ram = Ram::new();
        ram.load(&[7]).unwrap();
        let err = ram.load(&[0; MEMORY_SIZE + 1]).unwrap_err();
        assert!(matches!(
            err,
            Error::ProgramTooLarge {
                len: 257,
                capacity: MEMORY_SIZE
            }
        ));
        assert_eq!(ram.read(0).unwrap(), 7);
    }

    #[test]
    fn full_size_image_fits() {
        let mut ram = Ram::new();
        ram.load(&[0xFF; MEMORY_SIZE]).unwrap();
        assert_eq!(ram.read(255).unwrap(), 0xFF);
    }
}
