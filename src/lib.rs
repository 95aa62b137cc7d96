//! DocQA Server Library
//!
//! Ingests uploaded images and PDFs through OCR, stores the extracted text
//! under a session id, and answers questions grounded in that text.
//!
//! # Modules
//!
//! - `raster`: PDF page rasterization (MuPDF)
//! - `ocr`: text recognition providers (Tesseract, Ollama)
//! - `ingest`: the ingestion pipeline and its scoped workspace
//! - `session`: the session store and read-only resolver
//! - `chat`: grounded question answering
//! - `routes`: HTTP boundary

pub mod chat;
pub mod config;
pub mod error;
pub mod ingest;
pub mod ocr;
pub mod raster;
pub mod routes;
pub mod session;
pub mod state;
