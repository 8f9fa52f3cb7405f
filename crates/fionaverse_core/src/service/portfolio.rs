//! Portfolio use-case service.
//!
//! # Responsibility
//! - Declare every persisted slot of the site with its key and default.
//! - Provide the owner's editing actions on top of those slots.
//!
//! # Invariants
//! - Each action mutates exactly one slot.
//! - List additions go through form validation; nothing is stored on failure.
//! - Removals run only after the confirmation prompt answers yes.
//! - Persistence failures are logged and never undo the in-memory change.

use crate::form::{AchievementDraft, BlogPostDraft, GalleryDraft, ProjectDraft, ValidationError};
use crate::model::entity::{Achievement, BlogPost, GalleryItem, Project};
use crate::model::family::{FamilyMemberId, FamilyTree};
use crate::model::settings::{Tab, Theme};
use crate::model::EntityId;
use crate::service::confirm::ConfirmPrompt;
use crate::store::backend::StorageBackend;
use crate::store::list::{self, Identified};
use crate::store::slot::{Slot, SlotError};
use crate::upload::FileReadError;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

/// Storage keys, shared with earlier versions of the site.
pub mod keys {
    pub const THEME: &str = "theme";
    pub const ACTIVE_TAB: &str = "activeTab";
    pub const PROFILE_IMAGE: &str = "profileImage";
    pub const ABOUT_IMAGE: &str = "aboutImage";
    pub const BIO: &str = "bio";
    pub const YOUTUBE_URL: &str = "youtubeUrl";
    pub const FUN_FACTS: &str = "funFacts";
    pub const FAMILY_TREE: &str = "familyTree";
    pub const ACHIEVEMENTS: &str = "achievements";
    pub const PROJECTS: &str = "projects";
    pub const GALLERY_ITEMS: &str = "galleryItems";
    pub const BLOG_POSTS: &str = "blogPosts";
}

pub const DEFAULT_PROFILE_IMAGE: &str = "https://picsum.photos/200";
pub const DEFAULT_ABOUT_IMAGE: &str = "https://picsum.photos/600/800";
pub const DEFAULT_YOUTUBE_URL: &str = "https://www.youtube.com/embed/dQw4w9WgXcQ";
pub const DEFAULT_BIO: &str = "I thrive at the intersection of technology and art. My goal is to build meaningful digital experiences that are not only functional but also beautiful and intuitive. I'm driven by curiosity and a desire to constantly learn and grow.";
pub const DEFAULT_FUN_FACTS: [&str; 4] = [
    "I can solve a Rubik's cube in under a minute.",
    "My dream project is to create an interactive educational game for kids.",
    "I'm an avid stargazer and love astrophotography.",
    "My personality type is INFJ - The Advocate.",
];
/// Text of a freshly added fun fact.
pub const NEW_FUN_FACT: &str = "New fun fact!";

static YOUTU_BE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?youtu\.be/([A-Za-z0-9_-]+)").expect("valid youtu.be regex")
});

/// Rewrites a YouTube watch or short link into its embeddable form.
pub fn embed_url(url: &str) -> String {
    let url = url.trim();
    if let Some(captures) = YOUTU_BE_RE.captures(url) {
        return format!("https://www.youtube.com/embed/{}", &captures[1]);
    }
    url.replacen("watch?v=", "embed/", 1)
}

/// All persisted site content, built over one shared backend.
pub struct Portfolio {
    theme: Slot<Theme>,
    active_tab: Slot<Tab>,
    profile_image: Slot<String>,
    about_image: Slot<String>,
    bio: Slot<String>,
    youtube_url: Slot<String>,
    fun_facts: Slot<Vec<String>>,
    family: Slot<FamilyTree>,
    achievements: Slot<Vec<Achievement>>,
    projects: Slot<Vec<Project>>,
    gallery: Slot<Vec<GalleryItem>>,
    posts: Slot<Vec<BlogPost>>,
}

impl Portfolio {
    /// Loads every slot from `backend`, falling back to defaults.
    pub fn open(backend: Rc<dyn StorageBackend>) -> Result<Self, SlotError> {
        let portfolio = Self {
            theme: Slot::new(Rc::clone(&backend), keys::THEME, Theme::Dark)?,
            active_tab: Slot::new(Rc::clone(&backend), keys::ACTIVE_TAB, Tab::Home)?,
            profile_image: Slot::new(
                Rc::clone(&backend),
                keys::PROFILE_IMAGE,
                DEFAULT_PROFILE_IMAGE.to_string(),
            )?,
            about_image: Slot::new(
                Rc::clone(&backend),
                keys::ABOUT_IMAGE,
                DEFAULT_ABOUT_IMAGE.to_string(),
            )?,
            bio: Slot::new(Rc::clone(&backend), keys::BIO, DEFAULT_BIO.to_string())?,
            youtube_url: Slot::new(
                Rc::clone(&backend),
                keys::YOUTUBE_URL,
                DEFAULT_YOUTUBE_URL.to_string(),
            )?,
            fun_facts: Slot::new(
                Rc::clone(&backend),
                keys::FUN_FACTS,
                DEFAULT_FUN_FACTS.iter().map(|fact| fact.to_string()).collect(),
            )?,
            family: Slot::new(Rc::clone(&backend), keys::FAMILY_TREE, FamilyTree::default())?,
            achievements: Slot::new(Rc::clone(&backend), keys::ACHIEVEMENTS, Vec::new())?,
            projects: Slot::new(Rc::clone(&backend), keys::PROJECTS, Vec::new())?,
            gallery: Slot::new(Rc::clone(&backend), keys::GALLERY_ITEMS, Vec::new())?,
            posts: Slot::new(backend, keys::BLOG_POSTS, Vec::new())?,
        };
        info!(
            "event=portfolio_open module=service status=ok achievements={} projects={} gallery={} posts={}",
            portfolio.achievements.with(Vec::len),
            portfolio.projects.with(Vec::len),
            portfolio.gallery.with(Vec::len),
            portfolio.posts.with(Vec::len),
        );
        Ok(portfolio)
    }

    // Theme and navigation.

    pub fn theme(&self) -> Theme {
        self.theme.get()
    }

    pub fn toggle_theme(&self) -> Theme {
        keep_in_memory(self.theme.update(|theme| theme.toggled()), "toggle_theme");
        self.theme.get()
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab.get()
    }

    pub fn select_tab(&self, tab: Tab) {
        keep_in_memory(self.active_tab.set(tab), "select_tab");
    }

    /// Leaves the landing page and opens the About section.
    pub fn enter(&self) {
        self.select_tab(Tab::About);
    }

    // Home.

    pub fn youtube_url(&self) -> String {
        self.youtube_url.get()
    }

    pub fn set_youtube_url(&self, url: impl Into<String>) {
        keep_in_memory(self.youtube_url.set(url.into()), "set_youtube_url");
    }

    /// Welcome video URL in embeddable form.
    pub fn embed_url(&self) -> String {
        self.youtube_url.with(|url| embed_url(url))
    }

    // Profile and About.

    pub fn profile_image(&self) -> String {
        self.profile_image.get()
    }

    /// Applies a finished upload; returns whether the image changed.
    pub fn upload_profile_image(&self, encoded: Result<String, FileReadError>) -> bool {
        apply_upload(&self.profile_image, encoded, |_, image| image)
    }

    pub fn about_image(&self) -> String {
        self.about_image.get()
    }

    pub fn upload_about_image(&self, encoded: Result<String, FileReadError>) -> bool {
        apply_upload(&self.about_image, encoded, |_, image| image)
    }

    pub fn bio(&self) -> String {
        self.bio.get()
    }

    pub fn set_bio(&self, text: impl Into<String>) {
        keep_in_memory(self.bio.set(text.into()), "set_bio");
    }

    pub fn fun_facts(&self) -> Vec<String> {
        self.fun_facts.get()
    }

    /// Appends the placeholder fact for inline editing.
    pub fn add_fun_fact(&self) {
        keep_in_memory(
            self.fun_facts
                .update(|facts| list::append(facts, NEW_FUN_FACT.to_string())),
            "add_fun_fact",
        );
    }

    pub fn update_fun_fact(&self, index: usize, text: impl Into<String>) {
        let text = text.into();
        keep_in_memory(
            self.fun_facts
                .update(|facts| list::replace_at(facts, index, text)),
            "update_fun_fact",
        );
    }

    pub fn remove_fun_fact(&self, index: usize) {
        keep_in_memory(
            self.fun_facts.update(|facts| list::remove_at(facts, index)),
            "remove_fun_fact",
        );
    }

    // Family tree.

    pub fn family(&self) -> FamilyTree {
        self.family.get()
    }

    pub fn upload_family_image(
        &self,
        member: FamilyMemberId,
        encoded: Result<String, FileReadError>,
    ) -> bool {
        apply_upload(&self.family, encoded, |tree, image| {
            tree.with_image(member, image)
        })
    }

    // Achievements.

    pub fn achievements(&self) -> Vec<Achievement> {
        self.achievements.get()
    }

    pub fn add_achievement(&self, draft: AchievementDraft) -> Result<Achievement, ValidationError> {
        Ok(add_entity(&self.achievements, draft.submit()?))
    }

    pub fn delete_achievement(&self, id: &EntityId, prompt: &dyn ConfirmPrompt) -> bool {
        delete_entity(
            &self.achievements,
            id,
            prompt,
            "Are you sure you want to delete this achievement?",
        )
    }

    // Projects.

    pub fn projects(&self) -> Vec<Project> {
        self.projects.get()
    }

    pub fn add_project(&self, draft: ProjectDraft) -> Result<Project, ValidationError> {
        Ok(add_entity(&self.projects, draft.submit()?))
    }

    pub fn delete_project(&self, id: &EntityId, prompt: &dyn ConfirmPrompt) -> bool {
        delete_entity(
            &self.projects,
            id,
            prompt,
            "Are you sure you want to delete this project?",
        )
    }

    // Gallery.

    pub fn gallery(&self) -> Vec<GalleryItem> {
        self.gallery.get()
    }

    pub fn add_gallery_item(&self, draft: GalleryDraft) -> Result<GalleryItem, ValidationError> {
        Ok(add_entity(&self.gallery, draft.submit()?))
    }

    pub fn delete_gallery_item(&self, id: &EntityId, prompt: &dyn ConfirmPrompt) -> bool {
        delete_entity(
            &self.gallery,
            id,
            prompt,
            "Are you sure you want to delete this memory?",
        )
    }

    // Blog.

    pub fn posts(&self) -> Vec<BlogPost> {
        self.posts.get()
    }

    pub fn add_post(&self, draft: BlogPostDraft) -> Result<BlogPost, ValidationError> {
        Ok(add_entity(&self.posts, draft.submit()?))
    }

    pub fn delete_post(&self, id: &EntityId, prompt: &dyn ConfirmPrompt) -> bool {
        delete_entity(
            &self.posts,
            id,
            prompt,
            "Are you sure you want to delete this post?",
        )
    }

    // Slot handles, for presentation layers that subscribe to changes.

    pub fn theme_slot(&self) -> &Slot<Theme> {
        &self.theme
    }

    pub fn active_tab_slot(&self) -> &Slot<Tab> {
        &self.active_tab
    }

    pub fn fun_facts_slot(&self) -> &Slot<Vec<String>> {
        &self.fun_facts
    }

    pub fn family_slot(&self) -> &Slot<FamilyTree> {
        &self.family
    }

    pub fn achievements_slot(&self) -> &Slot<Vec<Achievement>> {
        &self.achievements
    }

    pub fn projects_slot(&self) -> &Slot<Vec<Project>> {
        &self.projects
    }

    pub fn gallery_slot(&self) -> &Slot<Vec<GalleryItem>> {
        &self.gallery
    }

    pub fn posts_slot(&self) -> &Slot<Vec<BlogPost>> {
        &self.posts
    }
}

/// The slot has already logged the failure; the change stays visible.
fn keep_in_memory(result: Result<(), SlotError>, action: &'static str) {
    if let Err(err) = result {
        warn!(
            "event=portfolio_action module=service status=unpersisted action={} error={}",
            action, err
        );
    }
}

fn add_entity<T>(slot: &Slot<Vec<T>>, entity: T) -> T
where
    T: Identified + Clone + Serialize + DeserializeOwned,
{
    let added = entity.clone();
    keep_in_memory(slot.update(|items| list::prepend(items, entity)), "add");
    info!(
        "event=entity_add module=service status=ok key={} id={}",
        slot.key(),
        added.id()
    );
    added
}

fn delete_entity<T>(
    slot: &Slot<Vec<T>>,
    id: &EntityId,
    prompt: &dyn ConfirmPrompt,
    question: &str,
) -> bool
where
    T: Identified + Clone + Serialize + DeserializeOwned,
{
    if !slot.with(|items| list::contains_id(items, id)) {
        return false;
    }
    if !prompt.confirm(question) {
        info!(
            "event=entity_delete module=service status=cancelled key={} id={}",
            slot.key(),
            id
        );
        return false;
    }

    keep_in_memory(slot.update(|items| list::remove_by_id(items, id)), "delete");
    info!(
        "event=entity_delete module=service status=ok key={} id={}",
        slot.key(),
        id
    );
    true
}

fn apply_upload<T, F>(slot: &Slot<T>, encoded: Result<String, FileReadError>, apply: F) -> bool
where
    T: Clone + Serialize + DeserializeOwned,
    F: FnOnce(&T, String) -> T,
{
    match encoded {
        Ok(image) => {
            keep_in_memory(slot.update(|current| apply(current, image)), "upload");
            true
        }
        Err(err) => {
            warn!(
                "event=upload module=service status=abandoned key={} error={}",
                slot.key(),
                err
            );
            false
        }
    }
}
