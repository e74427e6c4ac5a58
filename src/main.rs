use anyhow::{Context, Result};
use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::{GetGlDisplay, GlDisplay},
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32};
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    event::{Event, WindowEvent},
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use rgb_triangle::{
    config::{AppConfig, GlProfileKind},
    render::pick_most_samples,
    GlDriver, GlInfo, InitError, ShaderProgram, TriangleMesh, Vertex, INIT_FAILURE_EXIT_CODE,
};

// Field order is drop order: GL objects go before the surface and context.
struct App {
    mesh: Option<TriangleMesh>,
    program: ShaderProgram<GlDriver>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl App {
    fn new(config: &AppConfig, event_loop: &EventLoop<()>) -> Result<Self> {
        let window_builder = WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));

        let template = ConfigTemplateBuilder::new();
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                // The picker has to hand back a config, so an empty list
                // ends startup here.
                pick_most_samples(configs, |c| c.num_samples()).unwrap_or_else(|| {
                    error!("{}", InitError::NoFramebufferConfig);
                    std::process::exit(INIT_FAILURE_EXIT_CODE)
                })
            })
            .map_err(|e| InitError::Window(e.to_string()))?;

        let window = window.ok_or_else(|| InitError::Window("no window was created".into()))?;
        let raw_window_handle = window.raw_window_handle();

        let [major, minor] = config.rendering.gl_version;
        let profile = match config.rendering.profile {
            GlProfileKind::Core => GlProfile::Core,
            GlProfileKind::Compatibility => GlProfile::Compatibility,
        };
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(profile)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| InitError::Context(e.to_string()))?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|e| InitError::Context(e.to_string()))?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .map_err(|e| InitError::Context(e.to_string()))?;

        if config.rendering.vsync {
            if let Err(e) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        // Load OpenGL functions
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => std::ptr::null(),
        });
        if !gl::CreateShader::is_loaded() {
            return Err(InitError::Loader("glCreateShader").into());
        }
        if !gl::GetString::is_loaded() {
            return Err(InitError::Loader("glGetString").into());
        }

        GlInfo::query().log();

        let [r, g, b, a] = config.rendering.clear_color;
        let size = window.inner_size();
        unsafe {
            gl::ClearColor(r, g, b, a);
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }

        let shaders = &config.shaders;
        let mut program = ShaderProgram::new(GlDriver);
        let loaded = match &shaders.geometry {
            Some(geometry) => {
                program.load_from_files_with_geometry(&shaders.vertex, geometry, &shaders.fragment)
            }
            None => program.load_from_files(&shaders.vertex, &shaders.fragment),
        };
        loaded.context("Failed to load shader program")?;
        info!(
            "Loaded shader program {} from {:?} and {:?}",
            program.id(),
            shaders.vertex,
            shaders.fragment
        );

        let mesh = TriangleMesh::new(&Vertex::DEFAULT_TRIANGLE)?;

        Ok(Self {
            mesh: Some(mesh),
            program,
            gl_surface,
            gl_context,
            window,
        })
    }

    fn resize(&self, size: PhysicalSize<u32>) {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        self.gl_surface.resize(&self.gl_context, width, height);
        unsafe {
            gl::Viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    fn render(&self) {
        unsafe {
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }

        if let Some(mesh) = &self.mesh {
            match self.program.bind() {
                Ok(()) => mesh.draw(),
                Err(e) => error!("Skipping draw: {}", e),
            }
        }

        if let Err(e) = self.gl_surface.swap_buffers(&self.gl_context) {
            error!("Failed to swap buffers: {}", e);
        }
    }

    fn cleanup(&mut self) {
        self.mesh = None;
        self.program.clear();
    }
}

fn run(config: AppConfig) -> Result<()> {
    let event_loop = EventLoopBuilder::new()
        .build()
        .map_err(|e| InitError::Window(e.to_string()))?;
    let mut app = App::new(&config, &event_loop)?;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => {
                app.cleanup();
                elwt.exit();
            }
            WindowEvent::Resized(size) => app.resize(size),
            WindowEvent::RedrawRequested => app.render(),
            _ => (),
        },
        Event::AboutToWait => {
            app.window.request_redraw();
        }
        _ => (),
    })?;

    info!("Window closed");
    Ok(())
}

fn main() {
    let loaded = AppConfig::load();

    let level = match &loaded {
        Ok((config, _)) => config.log_level().unwrap_or(LevelFilter::Info),
        Err(_) => LevelFilter::Info,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    let result = loaded.and_then(|(config, path)| {
        match path {
            Some(path) => info!("Using config file {:?}", path),
            None => info!("No config file found, using defaults"),
        }
        if let Err(e) = config.log_level() {
            warn!("{}, falling back to info", e);
        }
        run(config)
    });

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(INIT_FAILURE_EXIT_CODE);
    }
}
