/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod write_all_flush;

mod limited_write_ext;
pub use limited_write_ext::LimitedWriteExt;

mod read_chunks;
pub use read_chunks::ReadChunksStop;

mod limited_read_ext;
pub use limited_read_ext::LimitedReadExt;
