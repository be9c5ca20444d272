pub const CHECK_READY: &str = r#"
() => ({
    readyState: document.readyState,
    ready: document.readyState !== 'loading'
})
"#;

pub const PLAY_AUDIO: &str = r#"
async () => {
    const audio = document.querySelector('#bgMusic');
    if (!audio) return { success: false, error: 'Element not found: #bgMusic' };
    await audio.play();
    return { success: true };
}
"#;

pub const PAUSE_AUDIO: &str = r#"
() => {
    const audio = document.querySelector('#bgMusic');
    if (!audio) return { success: false, error: 'Element not found: #bgMusic' };
    audio.pause();
    return { success: true };
}
"#;

pub const APPEND_PARTICLES: &str = r#"
(styles) => {
    const container = document.querySelector('#particles');
    if (!container) return { success: false, error: 'Element not found: #particles' };
    for (const style of styles) {
        const particle = document.createElement('div');
        particle.className = 'particle';
        particle.style.cssText = style;
        container.appendChild(particle);
    }
    return { success: true };
}
"#;
