// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models mirrored from the backend API.

pub mod auth;
pub mod blog;
pub mod contact;
pub mod dashboard;
pub mod faq;
pub mod gallery;
pub mod testimonial;
pub mod user;

pub use auth::{
    AuthSession, ChangePasswordRequest, LoginRequest, OtpSendRequest, OtpVerifyRequest,
    RegisterRequest, UpdateProfileRequest,
};
pub use blog::{Author, BlogCategory, BlogPost, CategoryInput, PostFilter, PostInput, PostStatus};
pub use contact::{ContactReceipt, ContactRequest};
pub use dashboard::DashboardStats;
pub use faq::{Faq, FaqInput};
pub use gallery::{GalleryFilter, GalleryImage, UploadedFile};
pub use testimonial::{Testimonial, TestimonialInput};
pub use user::User;
