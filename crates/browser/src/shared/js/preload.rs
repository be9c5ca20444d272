//! Page-side halves of the preload gate. Every element the gate tracks is
//! tagged with a `data-curtain-id` during enumeration so later calls can find
//! it again without holding remote object handles.

pub const ENUMERATE: &str = r#"
(token) => {
    const tag = (el, id) => { el.setAttribute('data-curtain-id', id); return id; };
    const images = Array.from(document.querySelectorAll('img')).map((img, i) => ({
        id: tag(img, `${token}-img-${i}`),
        src: img.getAttribute('src') || ''
    }));
    const backgrounds = Array.from(document.querySelectorAll('[data-bg]')).map((el, i) => ({
        id: tag(el, `${token}-bg-${i}`),
        source: el.getAttribute('data-bg')
    }));
    const loader = document.querySelector('#loader');
    return {
        images,
        backgrounds,
        loader: loader ? tag(loader, `${token}-loader`) : null
    };
}
"#;

pub const IMAGE_READINESS: &str = r#"
(id) => {
    const img = document.querySelector(`[data-curtain-id="${id}"]`);
    if (!img) return { complete: false, naturalHeight: 0 };
    return { complete: img.complete, naturalHeight: img.naturalHeight };
}
"#;

// A complete image never fires again, so a broken one settles as failed here.
pub const IMAGE_SETTLED: &str = r#"
(id) => new Promise((resolve) => {
    const img = document.querySelector(`[data-curtain-id="${id}"]`);
    if (!img) { resolve('failed'); return; }
    if (img.complete) { resolve(img.naturalHeight !== 0 ? 'loaded' : 'failed'); return; }
    img.addEventListener('load', () => resolve('loaded'), { once: true });
    img.addEventListener('error', () => resolve('failed'), { once: true });
})
"#;

pub const FETCH_IMAGE: &str = r#"
(url) => new Promise((resolve) => {
    const img = new Image();
    img.onload = () => resolve(true);
    img.onerror = () => resolve(false);
    img.src = url;
})
"#;

pub const APPLY_BACKGROUND: &str = r#"
(id, url) => {
    const el = document.querySelector(`[data-curtain-id="${id}"]`);
    if (!el) return { success: false, error: `Element not found: ${id}` };
    el.style.backgroundImage = `url(${url})`;
    return { success: true };
}
"#;

pub const HIDE_LOADER: &str = r#"
(id) => {
    const el = document.querySelector(`[data-curtain-id="${id}"]`);
    if (!el) return { success: false, error: `Element not found: ${id}` };
    el.classList.add('hidden');
    return { success: true };
}
"#;

pub const LOADER_ATTACHED: &str = r#"
(id) => {
    const el = document.querySelector(`[data-curtain-id="${id}"]`);
    return !!el && el.isConnected;
}
"#;

pub const DETACH_LOADER: &str = r#"
(id) => {
    const el = document.querySelector(`[data-curtain-id="${id}"]`);
    if (!el) return { success: false, error: `Element not found: ${id}` };
    el.remove();
    return { success: true };
}
"#;
