#![allow(dead_code)]

//! Shared fixture: the practice site's markup as a `MemoryPage`.

use pagefx_core::ElementRef;
use pagefx_core::memory::{ElementTemplate, MemoryPage};

pub const VIEWPORT: f64 = 800.0;
pub const HEADER: f64 = 120.0;
pub const PHONE_HREF: &str = "tel:0290000000";

pub struct Site {
    pub page: MemoryPage,
    pub header: ElementRef,
    pub toggle: Option<ElementRef>,
    pub nav: Option<ElementRef>,
    pub nav_contact: ElementRef,
    pub nav_dr: ElementRef,
    pub book_now: ElementRef,
    pub phone_cta: ElementRef,
    pub phone_link: ElementRef,
    pub hero_title: ElementRef,
    pub sections: Vec<ElementRef>,
    pub contact: ElementRef,
    pub accordion_headers: Vec<ElementRef>,
    pub accordion_items: Vec<ElementRef>,
    pub accordion_contents: Vec<ElementRef>,
}

pub fn site() -> Site {
    build(true)
}

pub fn site_without_menu() -> Site {
    build(false)
}

fn build(with_menu: bool) -> Site {
    let mut page = MemoryPage::new(VIEWPORT);
    let body = page.body_ref();

    let header = page.append(body, ElementTemplate::new("header").id("main-header").height(HEADER));
    let phone_cta = page.append(
        header,
        ElementTemplate::new("a").class("cta-phone-button").attr("href", "tel:+61290000000"),
    );
    let toggle = with_menu
        .then(|| page.append(header, ElementTemplate::new("button").class("mobile-menu-toggle")));
    let nav_parent = if with_menu {
        page.append(header, ElementTemplate::new("nav").id("main-nav"))
    } else {
        page.append(header, ElementTemplate::new("nav").class("desktop-nav"))
    };
    let nav = with_menu.then_some(nav_parent);
    let nav_dr = page.append(
        nav_parent,
        ElementTemplate::new("a").class("nav-link").attr("href", "#dr-leung"),
    );
    let nav_contact = page.append(
        nav_parent,
        ElementTemplate::new("a").class("nav-link").attr("href", "#contact"),
    );

    let hero = page.append(body, ElementTemplate::new("section").class("hero").top(0.0).height(700.0));
    let hero_title = page.append(hero, ElementTemplate::new("h1").class("hero-title-overlay"));
    let book_now = page.append(hero, ElementTemplate::new("a").class("hero-book-now-btn"));

    let dr = page.append(
        body,
        ElementTemplate::new("section").id("dr-leung").class("dr-leung-section").top(700.0).height(900.0),
    );
    let first = page.append(
        body,
        ElementTemplate::new("section").class("first-visit-section").top(1_600.0).height(1_000.0),
    );

    let accordion = page.append(first, ElementTemplate::new("div").class("accordion"));
    let mut accordion_headers = Vec::new();
    let mut accordion_items = Vec::new();
    let mut accordion_contents = Vec::new();
    for (i, natural) in [180.0, 240.0, 300.0].into_iter().enumerate() {
        let id = format!("faq-{i}");
        let item = page.append(
            accordion,
            ElementTemplate::new("div").class("accordion-item").attr("data-target", &id),
        );
        let h = page.append(item, ElementTemplate::new("button").class("accordion-header"));
        let c = page.append(
            item,
            ElementTemplate::new("div").id(&id).class("accordion-content").scroll_height(natural),
        );
        accordion_headers.push(h);
        accordion_items.push(item);
        accordion_contents.push(c);
    }

    let location = page.append(
        body,
        ElementTemplate::new("section").class("location-section").top(2_600.0).height(600.0),
    );
    let contact = page.append(
        body,
        ElementTemplate::new("section").id("contact").class("contact-section").top(3_200.0).height(500.0),
    );
    let footer = page.append(body, ElementTemplate::new("footer").top(3_700.0).height(200.0));
    let phone_link = page.append(footer, ElementTemplate::new("a").attr("href", PHONE_HREF));

    Site {
        page,
        header,
        toggle,
        nav,
        nav_contact,
        nav_dr,
        book_now,
        phone_cta,
        phone_link,
        hero_title,
        sections: vec![dr, first, location, contact],
        contact,
        accordion_headers,
        accordion_items,
        accordion_contents,
    }
}
