// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! stemlab-client: typed client for the STEM lab site backend
//!
//! This crate provides the authenticated API client (bearer tokens, envelope
//! unwrapping, one-shot token refresh) and typed services for the blog,
//! testimonials, FAQs, gallery, contact and account endpoints.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod otp;
pub mod services;
pub mod storage;

use client::ApiClient;
use services::{
    AuthService, BlogService, ContactService, DashboardService, FaqService, GalleryService,
    TestimonialService,
};

/// All services, sharing one client (and so one token store and refresh lock).
#[derive(Clone)]
pub struct Api {
    pub client: ApiClient,
    pub auth: AuthService,
    pub blog: BlogService,
    pub testimonials: TestimonialService,
    pub faqs: FaqService,
    pub gallery: GalleryService,
    pub contact: ContactService,
    pub dashboard: DashboardService,
}

impl Api {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthService::new(client.clone()),
            blog: BlogService::new(client.clone()),
            testimonials: TestimonialService::new(client.clone()),
            faqs: FaqService::new(client.clone()),
            gallery: GalleryService::new(client.clone()),
            contact: ContactService::new(client.clone()),
            dashboard: DashboardService::new(client.clone()),
            client,
        }
    }
}
