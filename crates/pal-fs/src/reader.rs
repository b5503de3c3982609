// Bounds-checked byte cursor over in-memory file contents.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("unexpected end of data: wanted {wanted} bytes at offset {offset}, {available} available")]
    UnexpectedEof {
        offset: usize,
        wanted: usize,
        available: usize,
    },
    #[error("seek to {target} outside of {size} byte buffer")]
    OutOfBounds { target: i64, size: usize },
}

#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    cursor: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, cursor: 0 }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.cursor)
    }

    pub fn can_read(&self, count: usize) -> bool {
        count <= self.remaining()
    }

    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Remaining bytes from the cursor to the end, without advancing.
    pub fn buffer(&self) -> &'a [u8] {
        &self.data[self.cursor..]
    }

    pub fn seek_to(&mut self, position: usize) -> Result<(), ReadError> {
        if position > self.data.len() {
            return Err(ReadError::OutOfBounds {
                target: position as i64,
                size: self.data.len(),
            });
        }
        self.cursor = position;
        Ok(())
    }

    pub fn seek_forward(&mut self, count: usize) -> Result<(), ReadError> {
        let target = self.cursor.checked_add(count).ok_or(ReadError::OutOfBounds {
            target: i64::MAX,
            size: self.data.len(),
        })?;
        self.seek_to(target)
    }

    /// Places the cursor `count` bytes before the end of the buffer.
    pub fn seek_from_end(&mut self, count: usize) -> Result<(), ReadError> {
        if count > self.data.len() {
            return Err(ReadError::OutOfBounds {
                target: self.data.len() as i64 - count as i64,
                size: self.data.len(),
            });
        }
        self.cursor = self.data.len() - count;
        Ok(())
    }

    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8], ReadError> {
        if !self.can_read(count) {
            return Err(ReadError::UnexpectedEof {
                offset: self.cursor,
                wanted: count,
                available: self.remaining(),
            });
        }
        let start = self.cursor;
        self.cursor += count;
        Ok(&self.data[start..start + count])
    }

    /// Fills `buf` completely or fails without moving the cursor.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<(), ReadError> {
        let bytes = self.read_bytes(buf.len())?;
        buf.copy_from_slice(bytes);
        Ok(())
    }

    pub fn read_to_vec(&mut self) -> Vec<u8> {
        let out = self.buffer().to_vec();
        self.cursor = self.data.len();
        out
    }

    pub fn sub_reader(&mut self, count: usize) -> Result<Reader<'a>, ReadError> {
        let bytes = self.read_bytes(count)?;
        Ok(Reader::new(bytes))
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        let bytes = self.read_bytes(1)?;
        Ok(bytes[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReadError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32, ReadError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        let bytes = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}
