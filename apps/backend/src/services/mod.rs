pub mod draft_lifecycle;
