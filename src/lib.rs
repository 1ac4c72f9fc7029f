//! Recruitment Bot - Telegram recruitment assistant
//!
//! This crate answers free chat with a generative-AI responder, lists job
//! offers, and walks users through conversational surveys one question at
//! a time.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
