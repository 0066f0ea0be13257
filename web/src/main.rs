mod api;
mod app;
mod components;
mod hooks;
mod pages;
mod utils;

fn main() {
    dioxus::launch(app::App);
}
