use nowplaying::{RenderInput, TopTrackInput};
use std::fmt::Write;

pub const WIDTH: u32 = 540;
pub const HEIGHT: u32 = 64;
pub const NOTHING_PLAYING: &str = "Nothing playing…";
const PLAY_INDICATOR: &str = "▶";

const CSS: &str = r#"
  p {
    display: block;
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    font-size: 14px;
    line-height: 1.5;
    color: #24292e;
    white-space: nowrap;
    overflow: hidden;
    text-overflow: ellipsis;
  }

  .container {
    display: flex;
    align-items: center;
    padding-top: 8px;
    padding-left: 4px;
  }

  .indicator {
    width: 16px;
    margin-right: 16px;
    font-size: 18px;
    font-weight: bold;
  }

  .details {
    display: flex;
    flex: 1;
    flex-direction: column;
    margin-top: -4px;
    margin-left: 8px;
    min-width: 0;
  }

  #track {
    font-weight: bold;
  }

  .gray {
    color: #586069;
  }

  .paused {
    animation-play-state: paused !important;
    background: #e1e4e8 !important;
  }

  img:not([src]) {
    content: url("data:image/gif;base64,R0lGODlhAQABAPAAAP///wAAACH5BAEAAAAALAAAAAABAAEAAAICRAEAOw==");
    background: #FFF;
    border: 1px solid #e1e4e8;
  }

  img {
    border-radius: 3px;
  }

  .progress-bar {
    position: relative;
    width: 100%;
    max-width: 360px;
    height: 4px;
    margin: -1px;
    margin-top: 4px;
    border: 1px solid #e1e4e8;
    border-radius: 4px;
    overflow: hidden;
    padding: 2px;
    z-index: 0;
  }

  #progress {
    position: absolute;
    top: -1px;
    left: 0;
    width: 100%;
    height: 6px;
    transform-origin: left center;
    background-color: #24292e;
    animation: progress calc(var(--duration) * 1ms) linear;
    animation-delay: calc(var(--progress) * -1ms);
  }

  #cover {
    box-shadow: 0 1px 3px rgba(0,0,0,0.1), 0 3px 10px rgba(0,0,0,0.05);
  }

  #cover:not([src]) {
    box-shadow: none;
  }

  @keyframes progress {
    from {
      transform: scaleX(0)
    }
    to {
      transform: scaleX(1)
    }
  }
"#;

/// Renders the now playing badge
pub fn render(input: &RenderInput) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<div class="container" style="--duration:{};--progress:{};">"#,
        input.duration_ms, input.progress_ms
    );
    // Ads report playing without an item
    let playing = input.is_playing && input.track.is_some();
    indicator(&mut body, if playing { PLAY_INDICATOR } else { "" });
    cover(&mut body, input.cover_data_uri.as_deref());
    body.push_str(r#"<div class="details">"#);
    match &input.track {
        Some(track) => {
            text(&mut body, "track", None, track);
            text(&mut body, "artist", None, &input.artist);
            // Paused playback keeps the bar at its current position
            let _ = write!(
                body,
                r#"<div class="progress-bar"><div id="progress" class="{}"></div></div>"#,
                if input.is_playing { "playing" } else { "paused" }
            );
        }
        None => {
            text(&mut body, "track", None, "");
            text(&mut body, "artist", Some("gray"), NOTHING_PLAYING);
        }
    }
    body.push_str("</div></div>");
    frame(&body)
}

/// Renders a badge for an entry of the top tracks list, ranked from 1
pub fn render_top_track(input: &TopTrackInput) -> String {
    let mut body = String::new();
    body.push_str(r#"<div class="container">"#);
    indicator(&mut body, &(input.index + 1).to_string());
    cover(&mut body, input.cover_data_uri.as_deref());
    body.push_str(r#"<div class="details">"#);
    text(&mut body, "track", None, &input.track);
    text(&mut body, "artist", None, &input.artist);
    body.push_str("</div></div>");
    frame(&body)
}

fn frame(body: &str) -> String {
    format!(
        r#"<svg fill="none" viewBox="0 0 {WIDTH} {HEIGHT}" width="{WIDTH}" height="{HEIGHT}" xmlns="http://www.w3.org/2000/svg"><foreignObject width="{WIDTH}" height="{HEIGHT}"><div xmlns="http://www.w3.org/1999/xhtml"><style>{CSS}</style>{body}</div></foreignObject></svg>"#
    )
}

fn indicator(body: &mut String, content: &str) {
    let _ = write!(body, r#"<p class="indicator">{}</p>"#, escape_text(content));
}

fn cover(body: &mut String, data_uri: Option<&str>) {
    match data_uri {
        Some(src) => {
            let _ = write!(
                body,
                r#"<img id="cover" src="{}" width="48" height="48"/>"#,
                escape_attribute(src)
            );
        }
        // The stylesheet draws a placeholder for images without a source
        None => body.push_str(r#"<img id="cover" width="48" height="48"/>"#),
    }
}

fn text(body: &mut String, id: &str, class: Option<&str>, content: &str) {
    let _ = match class {
        Some(class) => write!(
            body,
            r#"<p id="{id}" class="{class}">{}</p>"#,
            escape_text(content)
        ),
        None => write!(body, r#"<p id="{id}">{}</p>"#, escape_text(content)),
    };
}

fn escape_text(s: &str) -> String {
    html_escape::encode_text(&xml_chars(s)).into_owned()
}

fn escape_attribute(s: &str) -> String {
    html_escape::encode_double_quoted_attribute(&xml_chars(s)).into_owned()
}

/// Drops characters that can't appear in an XML 1.0 document
fn xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}
