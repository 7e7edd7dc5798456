// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API module
//!
//! Provides the POST /embed endpoint: a batch of sentences in, a batch
//! of L2-normalized embedding vectors out, in the same order.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::embed_handler;
pub use request::EmbedRequest;
pub use response::EmbedResponse;
