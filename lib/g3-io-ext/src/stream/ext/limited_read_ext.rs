/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use tokio::io::AsyncRead;

use super::read_chunks::ReadChunks;

pub trait LimitedReadExt: AsyncRead {
    /// Append to `buf` until the reader is closed or `max_reads` read operations are done
    fn read_chunks<'a>(&'a mut self, buf: &'a mut Vec<u8>, max_reads: usize) -> ReadChunks<'a, Self>
    where
        Self: Unpin,
    {
        ReadChunks::new(self, buf, None, max_reads)
    }

    /// Like `read_chunks`, but also stop as soon as `delimiter` shows up in the appended data
    fn read_chunks_until<'a>(
        &'a mut self,
        buf: &'a mut Vec<u8>,
        delimiter: &'a [u8],
        max_reads: usize,
    ) -> ReadChunks<'a, Self>
    where
        Self: Unpin,
    {
        ReadChunks::new(self, buf, Some(delimiter), max_reads)
    }
}

impl<R: AsyncRead> LimitedReadExt for R {}
