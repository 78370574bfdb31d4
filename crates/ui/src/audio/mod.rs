//! Ambient audio engine
//!
//! Two sine voices, one per stereo channel, each drifting in pitch on
//! its own timer. Channel gains follow the stored `volLeft`/`volRight`
//! preferences and the volume sliders.

pub mod drift;
pub mod mixer;

use std::rc::Rc;

use studydesk_protocol::Channel;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    AddEventListenerOptions, AudioContext, AudioContextState, AudioScheduledSourceNode, Document,
    Event, GainNode, HtmlInputElement, OscillatorType, Window,
};

use crate::config::AudioConfig;
use crate::dom::{find, ids};
use crate::error::{describe_js, Result};
use crate::storage::SettingsRepository;

use drift::DriftPlan;
use mixer::Mixer;

/// Constructors tried in order; older Safari only has the prefixed one
const CONTEXT_CONSTRUCTORS: [&str; 2] = ["AudioContext", "webkitAudioContext"];

/// Create an audio context if the browser has Web Audio
pub fn detect(win: &Window) -> Option<AudioContext> {
    CONTEXT_CONSTRUCTORS.into_iter().find_map(|name| {
        let ctor = js_sys::Reflect::get(win, &JsValue::from_str(name)).ok()?;
        let ctor = ctor.dyn_into::<js_sys::Function>().ok()?;
        let ctx = js_sys::Reflect::construct(&ctor, &js_sys::Array::new()).ok()?;
        tracing::debug!(constructor = name, "audio context created");
        Some(ctx.unchecked_into::<AudioContext>())
    })
}

/// Build the graph, start both voices and wire the sliders
pub fn start(
    win: &Window,
    doc: &Document,
    repo: Rc<SettingsRepository>,
    config: &AudioConfig,
) -> Result<()> {
    if !config.enabled {
        tracing::info!("ambient audio disabled by config");
        return Ok(());
    }
    let Some(ctx) = detect(win) else {
        tracing::info!("Web Audio unavailable, ambient audio off");
        return Ok(());
    };

    let plan = Rc::new(DriftPlan::from_config(config));

    // gain(L) -> merger input 0, gain(R) -> merger input 1, merger -> speakers
    let merger = ctx.create_channel_merger_with_number_of_inputs(2)?;
    let left = ctx.create_gain()?;
    let right = ctx.create_gain()?;
    left.connect_with_audio_node_and_output_and_input(&merger, 0, Channel::Left.index())?;
    right.connect_with_audio_node_and_output_and_input(&merger, 0, Channel::Right.index())?;
    merger.connect_with_audio_node(&ctx.destination())?;

    start_voice(win, &ctx, &left, &plan)?;
    start_voice(win, &ctx, &right, &plan)?;

    let mixer = Rc::new(Mixer::new(repo, left, right));
    bind_slider(doc, ids::VOLUME_LEFT, Channel::Left, &mixer)?;
    bind_slider(doc, ids::VOLUME_RIGHT, Channel::Right, &mixer)?;

    resume_on_first_click(win, ctx)?;
    tracing::info!("ambient audio started");
    Ok(())
}

/// One drifting sine oscillator feeding `gain`
fn start_voice(
    win: &Window,
    ctx: &AudioContext,
    gain: &GainNode,
    plan: &Rc<DriftPlan>,
) -> Result<()> {
    let mut rng = rand::thread_rng();

    let osc = ctx.create_oscillator()?;
    osc.set_type(OscillatorType::Sine);
    osc.frequency().set_value(plan.initial_frequency(&mut rng));
    osc.connect_with_audio_node(gain)?;
    let source: &AudioScheduledSourceNode = &osc;
    source.start()?;

    let period = plan.interval_ms(&mut rng);
    let ctx = ctx.clone();
    let plan = plan.clone();
    let tick = Closure::wrap(Box::new(move || {
        let target = plan.next_target(&mut rand::thread_rng());
        let end = plan.ramp_end(ctx.current_time());
        if let Err(e) = osc.frequency().linear_ramp_to_value_at_time(target, end) {
            tracing::trace!(error = %describe_js(&e), "frequency ramp not scheduled");
        }
    }) as Box<dyn FnMut()>);
    win.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        i32::try_from(period).unwrap_or(i32::MAX),
    )?;
    tick.forget();

    tracing::debug!(period_ms = period, "voice started");
    Ok(())
}

fn bind_slider(
    doc: &Document,
    id: &'static str,
    channel: Channel,
    mixer: &Rc<Mixer<GainNode>>,
) -> Result<()> {
    let Some(slider) = find::<HtmlInputElement>(doc, id) else {
        tracing::debug!(id, "volume slider not on this page");
        return Ok(());
    };

    let mixer = mixer.clone();
    let el = slider.clone();
    let on_input = Closure::wrap(Box::new(move |_e: Event| {
        mixer.on_slider(channel, &el.value());
    }) as Box<dyn FnMut(_)>);
    slider.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    on_input.forget();
    Ok(())
}

/// Browsers keep new contexts suspended until a user gesture
fn resume_on_first_click(win: &Window, ctx: AudioContext) -> Result<()> {
    let callback = Closure::once(Box::new(move || {
        if ctx.state() == AudioContextState::Running {
            return;
        }
        match ctx.resume() {
            Ok(promise) => spawn_local(async move {
                match JsFuture::from(promise).await {
                    Ok(_) => tracing::debug!("audio context resumed"),
                    Err(e) => tracing::warn!(error = %describe_js(&e), "audio resume rejected"),
                }
            }),
            Err(e) => tracing::warn!(error = %describe_js(&e), "audio resume failed"),
        }
    }) as Box<dyn FnOnce()>);

    let options = AddEventListenerOptions::new();
    options.set_once(true);
    win.add_event_listener_with_callback_and_add_event_listener_options(
        "click",
        callback.as_ref().unchecked_ref(),
        &options,
    )?;
    callback.forget();
    Ok(())
}
