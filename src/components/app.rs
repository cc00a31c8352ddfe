use super::glare_card::GlareCard;
use crate::theme::SCREEN_BACKGROUND;
use yew::prelude::*;

// Single screen: the card centered in the viewport
#[function_component(App)]
pub fn app() -> Html {
    let style = format!(
        "display:flex;align-items:center;justify-content:center;width:100vw;height:100vh;margin:0;background:{};",
        SCREEN_BACKGROUND.to_css()
    );
    html! {
        <div id="screen" style={style}>
            <GlareCard />
        </div>
    }
}
