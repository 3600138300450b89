/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadChunksStop {
    /// the peer closed the stream
    Closed,
    /// the delimiter was found, the value is the end offset of it in the buffer
    Delimiter(usize),
    /// the max read count has been reached
    Exhausted,
}

pub struct ReadChunks<'a, R: ?Sized> {
    reader: &'a mut R,
    buf: &'a mut Vec<u8>,
    delimiter: Option<&'a [u8]>,
    max_reads: usize,
    reads: usize,
}

impl<'a, R> ReadChunks<'a, R>
where
    R: AsyncRead + ?Sized + Unpin,
{
    pub(super) fn new(
        reader: &'a mut R,
        buf: &'a mut Vec<u8>,
        delimiter: Option<&'a [u8]>,
        max_reads: usize,
    ) -> Self {
        ReadChunks {
            reader,
            buf,
            delimiter,
            max_reads,
            reads: 0,
        }
    }
}

fn find_delimiter(buf: &[u8], old_len: usize, delimiter: &[u8]) -> Option<usize> {
    if delimiter.is_empty() {
        return Some(old_len);
    }
    // the delimiter may span the previous chunk
    let start = old_len.saturating_sub(delimiter.len() - 1);
    memchr::memmem::find(&buf[start..], delimiter).map(|p| start + p + delimiter.len())
}

impl<R> Future for ReadChunks<'_, R>
where
    R: AsyncRead + ?Sized + Unpin,
{
    type Output = io::Result<ReadChunksStop>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let me = &mut *self;
        loop {
            if me.reads >= me.max_reads {
                return Poll::Ready(Ok(ReadChunksStop::Exhausted));
            }

            let old_len = me.buf.len();
            me.buf.resize(old_len + CHUNK_SIZE, 0);
            let mut read_buf = ReadBuf::new(&mut me.buf[old_len..]);
            let r = Pin::new(&mut *me.reader).poll_read(cx, &mut read_buf);
            let nr = read_buf.filled().len();
            me.buf.truncate(old_len + nr);
            match r {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) => return Poll::Ready(Err(e)),
                Poll::Ready(Ok(_)) => {}
            }

            me.reads += 1;
            if nr == 0 {
                return Poll::Ready(Ok(ReadChunksStop::Closed));
            }
            if let Some(delimiter) = me.delimiter {
                if let Some(end) = find_delimiter(&me.buf[..], old_len, delimiter) {
                    return Poll::Ready(Ok(ReadChunksStop::Delimiter(end)));
                }
            }
        }
    }
}
