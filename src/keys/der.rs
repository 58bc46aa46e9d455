//! Minimal DER assembly and parsing for RSA public keys
//!
//! The verifier consumes RSA keys as ASN.1 `RSAPublicKey`
//! (`SEQUENCE { n INTEGER, e INTEGER }`). Keys arrive either as
//! modulus/exponent components or as an existing DER blob; both directions
//! are handled here.

use crate::error::ProviderError;

/// Emit a single TLV element: tag, DER length, contents
fn tlv(tag: u8, contents: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + contents.len());
    out.push(tag);
    write_length(&mut out, contents.len());
    out.extend_from_slice(contents);
    out
}

fn write_length(out: &mut Vec<u8>, len: usize) {
    if len < 0x80 {
        out.push(len as u8);
        return;
    }
    let width = (usize::BITS - len.leading_zeros()).div_ceil(8) as usize;
    out.push(0x80 | width as u8);
    for shift in (0..width).rev() {
        out.push((len >> (shift * 8)) as u8);
    }
}

fn unsigned_integer(bytes: &[u8]) -> Vec<u8> {
    // INTEGER is signed; a set high bit needs a 0x00 pad byte to stay
    // positive.
    let pad = bytes.first().is_some_and(|b| b & 0x80 != 0);
    let mut contents = Vec::with_capacity(bytes.len() + usize::from(pad));
    if pad {
        contents.push(0x00);
    }
    contents.extend_from_slice(bytes);
    tlv(0x02, &contents)
}

/// Build `RSAPublicKey` DER from modulus (n) and exponent (e) bytes
/// (big-endian)
pub fn rsa_public_key_from_n_e(n: &[u8], e: &[u8]) -> Result<Vec<u8>, ProviderError> {
    if n.is_empty() || e.is_empty() {
        return Err(ProviderError::LoadError(
            "rsa key missing modulus or exponent".to_string(),
        ));
    }

    let mut body = unsigned_integer(n);
    body.extend(unsigned_integer(e));
    Ok(tlv(0x30, &body))
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn byte(&mut self) -> Result<u8, ProviderError> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| ProviderError::LoadError("truncated DER".to_string()))?;
        self.pos += 1;
        Ok(b)
    }

    fn length(&mut self) -> Result<usize, ProviderError> {
        let first = self.byte()?;
        if first < 0x80 {
            return Ok(first as usize);
        }
        let count = (first & 0x7F) as usize;
        if count == 0 || count > std::mem::size_of::<usize>() {
            return Err(ProviderError::LoadError("invalid DER length".to_string()));
        }
        let mut len = 0usize;
        for _ in 0..count {
            len = (len << 8) | self.byte()? as usize;
        }
        Ok(len)
    }

    fn expect_tag(&mut self, tag: u8) -> Result<usize, ProviderError> {
        let actual = self.byte()?;
        if actual != tag {
            return Err(ProviderError::LoadError(format!(
                "unexpected DER tag: {actual:#04x} (wanted {tag:#04x})"
            )));
        }
        self.length()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], ProviderError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.bytes.len())
            .ok_or_else(|| ProviderError::LoadError("truncated DER".to_string()))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }
}

/// Read modulus (n) and exponent (e) bytes out of `RSAPublicKey` DER
///
/// Leading zero padding of the INTEGER encoding is stripped.
pub fn rsa_n_e_from_public_key(der: &[u8]) -> Result<(Vec<u8>, Vec<u8>), ProviderError> {
    let mut reader = Reader::new(der);
    reader.expect_tag(0x30)?;

    let n_len = reader.expect_tag(0x02)?;
    let n = strip_leading_zeros(reader.take(n_len)?);

    let e_len = reader.expect_tag(0x02)?;
    let e = strip_leading_zeros(reader.take(e_len)?);

    if n.is_empty() || e.is_empty() {
        return Err(ProviderError::LoadError(
            "rsa key missing modulus or exponent".to_string(),
        ));
    }
    Ok((n.to_vec(), e.to_vec()))
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}
