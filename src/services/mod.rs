// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - typed endpoint wrappers over the shared client.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod dashboard;
pub mod faqs;
pub mod gallery;
pub mod testimonials;

pub use auth::AuthService;
pub use blog::BlogService;
pub use contact::ContactService;
pub use dashboard::DashboardService;
pub use faqs::FaqService;
pub use gallery::GalleryService;
pub use testimonials::TestimonialService;
