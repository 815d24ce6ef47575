use crate::CommError;

/// Phase tag carried by every point-to-point transfer.
///
/// The distribute and collect phases use distinct tags so the two band
/// transfers between the same pair of ranks can never be confused, and the
/// collectives use their own tags so they never match a band transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    DistributeBand,
    CollectBand,
    Barrier,
    Broadcast,
    Gather,
}

/// A fixed-size group of cooperating ranks.
///
/// `send`/`recv` are blocking tagged point-to-point byte transfers; the
/// collectives are built on top of them with a hub rank (rank 0 for the
/// barrier, the given root otherwise), so a substrate only has to provide
/// the two transfer primitives plus `abort`.
///
/// All operations are fail-fast: once any rank calls [`Group::abort`],
/// every blocked or future operation on every rank returns
/// [`CommError::Aborted`]. There are no timeouts and no retries.
pub trait Group {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Delivers `payload` to rank `to` under `tag`. Blocking.
    fn send(&self, to: usize, tag: Tag, payload: &[u8]) -> Result<(), CommError>;

    /// Receives the next transfer from rank `from` under `tag`. Blocking.
    fn recv(&self, from: usize, tag: Tag) -> Result<Vec<u8>, CommError>;

    /// Posts an abort to every rank in the group, including this one.
    fn abort(&self);

    /// Receives into `buf`, failing on any length mismatch (a short or
    /// oversized transfer is a fatal transport error, never truncated).
    fn recv_into(&self, from: usize, tag: Tag, buf: &mut [u8]) -> Result<(), CommError> {
        let payload = self.recv(from, tag)?;
        if payload.len() != buf.len() {
            return Err(CommError::SizeMismatch {
                expected: buf.len(),
                actual: payload.len(),
            });
        }
        buf.copy_from_slice(&payload);
        Ok(())
    }

    /// Blocks until every rank in the group has arrived.
    fn barrier(&self) -> Result<(), CommError> {
        if self.rank() == 0 {
            for r in 1..self.size() {
                self.recv_into(r, Tag::Barrier, &mut [])?;
            }
            for r in 1..self.size() {
                self.send(r, Tag::Barrier, &[])?;
            }
        } else {
            self.send(0, Tag::Barrier, &[])?;
            self.recv_into(0, Tag::Barrier, &mut [])?;
        }
        Ok(())
    }

    /// Distributes `payload` from `root` to every rank. The root must pass
    /// `Some(payload)`; every rank returns the broadcast bytes.
    fn broadcast(&self, root: usize, payload: Option<&[u8]>) -> Result<Vec<u8>, CommError> {
        if root >= self.size() {
            return Err(CommError::InvalidRank {
                rank: root,
                size: self.size(),
            });
        }
        if self.rank() == root {
            let payload = payload.ok_or(CommError::MissingRootPayload)?;
            for r in (0..self.size()).filter(|&r| r != root) {
                self.send(r, Tag::Broadcast, payload)?;
            }
            Ok(payload.to_vec())
        } else {
            self.recv(root, Tag::Broadcast)
        }
    }

    /// Gathers one payload per rank at `root`, in rank order. Returns
    /// `Some(payloads)` on the root and `None` everywhere else.
    fn gather(&self, root: usize, payload: &[u8]) -> Result<Option<Vec<Vec<u8>>>, CommError> {
        if root >= self.size() {
            return Err(CommError::InvalidRank {
                rank: root,
                size: self.size(),
            });
        }
        if self.rank() == root {
            let mut out = Vec::with_capacity(self.size());
            for r in 0..self.size() {
                if r == root {
                    out.push(payload.to_vec());
                } else {
                    out.push(self.recv(r, Tag::Gather)?);
                }
            }
            Ok(Some(out))
        } else {
            self.send(root, Tag::Gather, payload)?;
            Ok(None)
        }
    }
}

fn decode_lane<const N: usize>(frame: &[u8]) -> Result<[u8; N], CommError> {
    frame.try_into().map_err(|_| CommError::SizeMismatch {
        expected: N,
        actual: frame.len(),
    })
}

/// Gathers one `f64` per rank at `root`, in rank order.
pub fn gather_f64<G: Group + ?Sized>(
    group: &G,
    root: usize,
    value: f64,
) -> Result<Option<Vec<f64>>, CommError> {
    match group.gather(root, &value.to_le_bytes())? {
        Some(frames) => frames
            .iter()
            .map(|frame| decode_lane::<8>(frame).map(f64::from_le_bytes))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        None => Ok(None),
    }
}

/// Gathers one `u64` per rank at `root`, in rank order.
pub fn gather_u64<G: Group + ?Sized>(
    group: &G,
    root: usize,
    value: u64,
) -> Result<Option<Vec<u64>>, CommError> {
    match group.gather(root, &value.to_le_bytes())? {
        Some(frames) => frames
            .iter()
            .map(|frame| decode_lane::<8>(frame).map(u64::from_le_bytes))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        None => Ok(None),
    }
}
