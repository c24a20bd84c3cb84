mod tests {
    use cooplight::{
        Error, OutputDriver, PixelEngine, PixelMode, PixelProgram, PixelStrip, RANDOM_COLOR, Rgb,
        RunState, Scheduler, TaskControl, TickClock,
        color::{gamma_rgb, hue_to_rgb},
        pixel::{RENDER_TASK_NAME, SWEEPER_TASK_NAME},
    };

    const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    const RED: Rgb = Rgb { r: 255, g: 0, b: 0 };
    const GREEN: Rgb = Rgb { r: 0, g: 255, b: 0 };
    const BLUE: Rgb = Rgb { r: 0, g: 0, b: 255 };

    #[derive(Default)]
    struct Driver {
        frame: Vec<Rgb>,
        writes: usize,
    }

    impl OutputDriver for Driver {
        fn write(&mut self, colors: &[Rgb]) {
            self.frame = colors.to_vec();
            self.writes += 1;
        }
    }

    type Engine = PixelEngine<Driver, 2, 8>;

    struct App {
        pixels: Engine,
    }

    impl AsMut<Engine> for App {
        fn as_mut(&mut self) -> &mut Engine {
            &mut self.pixels
        }
    }

    type TestScheduler = Scheduler<TickClock, App, 4>;

    fn setup(num_leds: usize) -> (App, TestScheduler) {
        let mut pixels = Engine::new(7);
        pixels
            .add_strip(PixelStrip::new("Shelf", num_leds, Driver::default()).unwrap())
            .unwrap();
        pixels
            .add_strip(PixelStrip::new("Porch", num_leds, Driver::default()).unwrap())
            .unwrap();
        (App { pixels }, Scheduler::new(TickClock::new()))
    }

    fn chase(colors: &[u32]) -> PixelProgram {
        PixelProgram::new(PixelMode::Chase)
            .with_colors(colors)
            .unwrap()
    }

    fn pixels(app: &App) -> &[Rgb] {
        app.pixels.strip(0).unwrap().pixels()
    }

    #[test]
    fn test_chase_fill_single_color() {
        let (mut app, mut scheduler) = setup(4);
        let program = chase(&[0x00_00FF]).with_offset(1).with_fill(true);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(pixels(&app), [BLUE; 4]);
        assert_eq!(app.pixels.strip(0).unwrap().driver().frame, [BLUE; 4]);
        assert_eq!(app.pixels.strip(0).unwrap().cursor().index, 1);
    }

    #[test]
    fn test_chase_single_color_without_fill() {
        let (mut app, mut scheduler) = setup(4);
        let program = chase(&[0x00_00FF]).with_offset(1);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(pixels(&app), [BLUE, BLACK, BLACK, BLACK]);

        app.pixels.render(1);
        assert_eq!(pixels(&app), [BLUE, BLUE, BLACK, BLACK]);
    }

    #[test]
    fn test_chase_covers_strip() {
        let (mut app, mut scheduler) = setup(5);
        let program = chase(&[0x00_00FF]).with_offset(2);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        for t in 0..5 {
            app.pixels.render(t);
        }
        assert_eq!(pixels(&app), [BLUE; 5]);
    }

    #[test]
    fn test_chase_program_head_leads() {
        let (mut app, mut scheduler) = setup(4);
        let program = chase(&[0xFF_0000, 0x00_FF00]).with_wipe(true);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(pixels(&app), [RED, BLACK, BLACK, GREEN]);

        app.pixels.render(1);
        assert_eq!(pixels(&app), [GREEN, RED, BLACK, BLACK]);
    }

    #[test]
    fn test_chase_negative_offset() {
        let (mut app, mut scheduler) = setup(4);
        let program = chase(&[0xFF_0000]).with_wipe(true).with_offset(-1);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(app.pixels.strip(0).unwrap().cursor().index, 3);
        app.pixels.render(1);
        assert_eq!(pixels(&app), [BLACK, BLACK, BLACK, RED]);
    }

    #[test]
    fn test_chase_toggle_flips_direction() {
        let (mut app, mut scheduler) = setup(8);
        let program = chase(&[0xFF_0000]).with_wipe(true).with_toggle(2);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        let mut indexes = Vec::new();
        for t in 0..4 {
            app.pixels.render(t);
            indexes.push(app.pixels.strip(0).unwrap().cursor().index);
        }
        assert_eq!(indexes, [1, 0, 7, 0]);
        assert_eq!(app.pixels.strip(0).unwrap().cursor().offset, 1);
    }

    #[test]
    fn test_chase_append_fills_then_wipes() {
        let (mut app, mut scheduler) = setup(8);
        let program = chase(&[0xFF_0000, 0x00_FF00]).with_append(true);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        app.pixels.render(1);
        assert_eq!(
            pixels(&app),
            [RED, GREEN, RED, BLACK, BLACK, BLACK, BLACK, GREEN]
        );
        assert_eq!(app.pixels.strip(0).unwrap().cursor().index, 4);

        app.pixels.render(2);
        app.pixels.render(3);
        assert_eq!(pixels(&app), [RED, GREEN, RED, GREEN, RED, GREEN, RED, GREEN]);
        assert_eq!(app.pixels.strip(0).unwrap().cursor().index, 0);

        app.pixels.render(4);
        assert_eq!(
            pixels(&app),
            [RED, BLACK, BLACK, BLACK, BLACK, BLACK, BLACK, GREEN]
        );
    }

    #[test]
    fn test_chase_append_backwards() {
        let (mut app, mut scheduler) = setup(8);
        let program = chase(&[0xFF_0000, 0x00_FF00])
            .with_append(true)
            .with_offset(-1);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(app.pixels.strip(0).unwrap().cursor().index, 6);
        app.pixels.render(1);
        assert_eq!(
            pixels(&app),
            [RED, BLACK, BLACK, BLACK, BLACK, GREEN, RED, GREEN]
        );
    }

    #[test]
    fn test_brightness_scales_output_only() {
        let (mut app, mut scheduler) = setup(2);
        let program = chase(&[0xFF_FFFF])
            .with_fill(true)
            .with_brightness(128);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        let strip = app.pixels.strip(0).unwrap();
        assert_eq!(strip.brightness(), 128);
        assert_eq!(strip.pixels(), [Rgb::new(255, 255, 255); 2]);
        assert_eq!(strip.driver().frame, [Rgb::new(128, 128, 128); 2]);
    }

    #[test]
    fn test_delay_throttles_frames() {
        let (mut app, mut scheduler) = setup(4);
        let program = chase(&[0xFF_0000]).with_delay(100);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();
        let writes = app.pixels.strip(0).unwrap().driver().writes;

        for t in [50, 100, 150, 199, 200] {
            app.pixels.render(t);
        }
        assert_eq!(app.pixels.strip(0).unwrap().driver().writes, writes + 2);
    }

    #[test]
    fn test_rainbow() {
        let (mut app, mut scheduler) = setup(4);
        let program = PixelProgram::new(PixelMode::Rainbow)
            .with_colors(&[RANDOM_COLOR])
            .unwrap();
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(pixels(&app)[0], gamma_rgb(hue_to_rgb(0)));
        assert_eq!(pixels(&app)[2], gamma_rgb(hue_to_rgb(32768)));

        app.pixels.render(1);
        assert_eq!(pixels(&app)[0], gamma_rgb(hue_to_rgb(256)));
        assert_eq!(pixels(&app)[1], gamma_rgb(hue_to_rgb(256 + 16384)));
    }

    #[test]
    fn test_chase_rainbow_lights_every_third_pixel() {
        let (mut app, mut scheduler) = setup(6);
        let program = PixelProgram::new(PixelMode::ChaseRainbow)
            .with_colors(&[RANDOM_COLOR])
            .unwrap();
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        for (t, phase) in [0, 1, 2, 0].into_iter().enumerate() {
            app.pixels.render(t as u32);
            for (position, pixel) in pixels(&app).iter().enumerate() {
                if position % 3 != phase {
                    assert_eq!(*pixel, BLACK);
                }
            }
        }
    }

    #[test]
    fn test_random_is_seeded() {
        let program = PixelProgram::new(PixelMode::Random)
            .with_colors(&[RANDOM_COLOR])
            .unwrap();
        let (mut first, mut scheduler) = setup(8);
        let (mut second, _) = setup(8);
        first.pixels.set_program(0, &program, &mut scheduler).unwrap();
        second.pixels.set_program(0, &program, &mut scheduler).unwrap();

        first.pixels.render(0);
        second.pixels.render(0);
        assert!(pixels(&first).iter().filter(|pixel| **pixel != BLACK).count() <= 1);

        for t in 1..20 {
            first.pixels.render(t);
            second.pixels.render(t);
        }
        assert_eq!(pixels(&first), pixels(&second));
    }

    #[test]
    fn test_set_program_twice_same_first_frame() {
        let (mut app, mut scheduler) = setup(6);
        let program = chase(&[RANDOM_COLOR, 0x00_00FF]).with_fill(true);

        app.pixels.set_program(0, &program, &mut scheduler).unwrap();
        app.pixels.reseed(3);
        app.pixels.render(0);
        let first = pixels(&app).to_vec();

        app.pixels.set_program(0, &program, &mut scheduler).unwrap();
        app.pixels.reseed(3);
        app.pixels.render(0);
        assert_eq!(pixels(&app), first);
    }

    #[test]
    fn test_curtain_both_sides() {
        let (mut app, mut scheduler) = setup(6);
        let program = PixelProgram::new(PixelMode::Curtain)
            .with_colors(&[0x00_00FF])
            .unwrap();
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(pixels(&app), [BLUE, BLACK, BLACK, BLACK, BLACK, BLUE]);
        app.pixels.render(1);
        app.pixels.render(2);
        assert_eq!(pixels(&app), [BLUE; 6]);
        app.pixels.render(3);
        assert_eq!(pixels(&app), [BLUE, BLUE, BLACK, BLACK, BLUE, BLUE]);
    }

    #[test]
    fn test_curtain_left_wipes_after_pass() {
        let (mut app, mut scheduler) = setup(3);
        let program = PixelProgram::new(PixelMode::CurtainLeft)
            .with_colors(&[0x00_00FF])
            .unwrap()
            .with_wipe(true);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        for t in 0..3 {
            app.pixels.render(t);
        }
        assert_eq!(pixels(&app), [BLUE; 3]);

        app.pixels.render(3);
        assert_eq!(pixels(&app), [BLUE, BLACK, BLACK]);
    }

    #[test]
    fn test_curtain_right() {
        let (mut app, mut scheduler) = setup(3);
        let program = PixelProgram::new(PixelMode::CurtainRight)
            .with_colors(&[0xFF_0000])
            .unwrap();
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        app.pixels.render(0);
        assert_eq!(pixels(&app), [BLACK, BLACK, RED]);
        app.pixels.render(1);
        assert_eq!(pixels(&app), [BLACK, RED, RED]);
    }

    #[test]
    fn test_abacus_stacks_beads() {
        let (mut app, mut scheduler) = setup(4);
        let program = PixelProgram::new(PixelMode::Abacus)
            .with_colors(&[0x00_00FF])
            .unwrap()
            .with_offset(0);
        app.pixels.set_program(0, &program, &mut scheduler).unwrap();

        let expected = [
            [BLUE, BLACK, BLACK, BLACK],
            [BLACK, BLUE, BLACK, BLACK],
            [BLACK, BLACK, BLUE, BLACK],
            [BLACK, BLACK, BLACK, BLUE],
            [BLUE, BLACK, BLACK, BLUE],
        ];
        for (t, frame) in expected.iter().enumerate() {
            app.pixels.render(t as u32);
            assert_eq!(pixels(&app), frame);
        }
        let cursor = app.pixels.strip(0).unwrap().cursor();
        assert_eq!(cursor.index, 2);
        assert_eq!(cursor.offset, 1);
    }

    #[test]
    fn test_off_disables_and_clears() {
        let (mut app, mut scheduler) = setup(4);
        app.pixels
            .set_program(0, &chase(&[0xFF_0000]).with_fill(true), &mut scheduler)
            .unwrap();
        app.pixels.render(0);

        app.pixels
            .set_program(0, &PixelProgram::new(PixelMode::Off), &mut scheduler)
            .unwrap();
        let strip = app.pixels.strip(0).unwrap();
        assert!(!strip.is_enabled());
        assert_eq!(strip.driver().frame, [BLACK; 4]);
        assert!(strip.program().is_empty());
    }

    #[test]
    fn test_unknown_mode_disables_strip() {
        let (mut app, mut scheduler) = setup(4);
        app.pixels
            .set_program(0, &chase(&[0xFF_0000]).with_fill(true), &mut scheduler)
            .unwrap();
        app.pixels.render(0);

        assert_eq!(
            app.pixels
                .set_program_named(0, "sparkle", chase(&[0xFF_0000]), &mut scheduler),
            Err(Error::UnknownMode)
        );
        let strip = app.pixels.strip(0).unwrap();
        assert!(!strip.is_enabled());
        assert_eq!(strip.mode(), PixelMode::Off);
        assert_eq!(strip.driver().frame, [BLACK; 4]);
    }

    #[test]
    fn test_set_program_named() {
        let (mut app, mut scheduler) = setup(4);
        app.pixels
            .set_program_named(0, "curtain_left", chase(&[0xFF_0000]), &mut scheduler)
            .unwrap();
        assert_eq!(app.pixels.strip(0).unwrap().mode(), PixelMode::CurtainLeft);
        assert!(scheduler.is_registered(RENDER_TASK_NAME));
    }

    #[test]
    fn test_empty_colors_rejected() {
        let (mut app, mut scheduler) = setup(4);
        assert_eq!(
            app.pixels
                .set_program(0, &PixelProgram::new(PixelMode::Chase), &mut scheduler),
            Err(Error::EmptyProgram)
        );
        assert!(!app.pixels.any_enabled());
        assert!(!scheduler.is_registered(RENDER_TASK_NAME));
    }

    #[test]
    fn test_rejected_program_keeps_previous() {
        let (mut app, mut scheduler) = setup(4);
        app.pixels
            .set_program(0, &chase(&[0xFF_0000]), &mut scheduler)
            .unwrap();
        app.pixels.render(0);

        assert_eq!(
            app.pixels
                .set_program(0, &PixelProgram::new(PixelMode::Abacus), &mut scheduler),
            Err(Error::EmptyProgram)
        );
        let strip = app.pixels.strip(0).unwrap();
        assert!(!strip.is_enabled());
        assert_eq!(strip.mode(), PixelMode::Chase);
        assert_eq!(strip.program(), [0xFF_0000]);
    }

    #[test]
    fn test_full_task_table_leaves_strip_idle() {
        fn noop(_app: &mut App, _tasks: &mut dyn TaskControl<App>) {}

        let (mut app, _) = setup(4);
        let mut scheduler: Scheduler<TickClock, App, 1> = Scheduler::new(TickClock::new());
        scheduler.register("busy", RunState::ALL, 10, noop).unwrap();

        assert_eq!(
            app.pixels
                .set_program(0, &chase(&[0x00_00FF]), &mut scheduler),
            Err(Error::TaskListFull)
        );
        let strip = app.pixels.strip(0).unwrap();
        assert!(!strip.is_enabled());
        assert_eq!(strip.mode(), PixelMode::Off);
        assert!(strip.program().is_empty());
        assert!(!scheduler.is_registered(RENDER_TASK_NAME));
    }

    #[test]
    fn test_strip_length_and_lookup() {
        assert_eq!(
            PixelStrip::<Driver, 8>::new("long", 9, Driver::default()).err(),
            Some(Error::InvalidLength)
        );
        assert_eq!(
            PixelStrip::<Driver, 8>::new("empty", 0, Driver::default()).err(),
            Some(Error::InvalidLength)
        );

        let (mut app, mut scheduler) = setup(4);
        assert_eq!(app.pixels.find("Porch"), Some(1));
        assert_eq!(app.pixels.find("Attic"), None);
        assert_eq!(
            app.pixels.set_program(2, &chase(&[1]), &mut scheduler),
            Err(Error::UnknownTarget)
        );
        assert_eq!(
            app.pixels.add_strip(PixelStrip::new("Extra", 4, Driver::default()).unwrap()),
            Err(Error::CapacityExceeded)
        );
    }

    #[test]
    fn test_mode_names() {
        for raw in 0..9 {
            let mode = PixelMode::from_raw(raw).unwrap();
            assert_eq!(PixelMode::parse_from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(PixelMode::from_raw(9), None);
        assert_eq!(
            PixelMode::parse_from_str("chase_rainbow"),
            Some(PixelMode::ChaseRainbow)
        );
        assert_eq!(PixelMode::parse_from_str("Chase"), None);
    }

    #[test]
    fn test_program_builder() {
        let mut program = PixelProgram::new(PixelMode::Chase)
            .with_colors(&[0xAB12_3456, RANDOM_COLOR])
            .unwrap();
        assert_eq!(program.colors, [0x12_3456, RANDOM_COLOR]);

        program.push_random().unwrap();
        assert_eq!(program.colors.len(), 3);

        let full = PixelProgram::new(PixelMode::Chase).with_colors(&[0; 33]);
        assert_eq!(full.err(), Some(Error::ProgramTooLong));
    }

    #[test]
    fn test_parse_legacy() {
        let program = PixelProgram::parse_legacy("1;50;0;0xFF0000,0x00FF00").unwrap();
        assert_eq!(program.mode, PixelMode::Chase);
        assert_eq!(program.offset, 1);
        assert_eq!(program.delay_ms, 50);
        assert!(program.wipe);
        assert!(!program.fill);
        assert_eq!(program.colors, [0xFF_0000, 0x00_FF00]);

        let program = PixelProgram::parse_legacy("-1;20;1,0x0000FF,random").unwrap();
        assert_eq!(program.offset, -1);
        assert!(program.fill);
        assert!(!program.wipe);
        assert_eq!(program.colors, [0x00_00FF, RANDOM_COLOR]);

        let program = PixelProgram::parse_legacy("0;10;2").unwrap();
        assert!(!program.wipe && !program.fill);
        assert!(program.append);
        assert!(program.colors.is_empty());

        assert_eq!(
            PixelProgram::parse_legacy("1;0;7;0xFF").err(),
            Some(Error::InvalidNumber)
        );
        assert_eq!(
            PixelProgram::parse_legacy("1;0;0;blue").err(),
            Some(Error::InvalidColor)
        );
    }

    #[test]
    fn test_sweeper_stops_render_task() {
        let (mut app, mut scheduler) = setup(4);
        app.pixels.install(&mut scheduler).unwrap();
        assert!(scheduler.is_registered(SWEEPER_TASK_NAME));
        scheduler.set_run_state(RunState::STA_UP);

        scheduler.dispatch(&mut app);
        assert!(!scheduler.is_registered(RENDER_TASK_NAME));

        app.pixels
            .set_program_named(0, "random", chase(&[RANDOM_COLOR]), &mut scheduler)
            .unwrap();
        assert!(scheduler.is_registered(RENDER_TASK_NAME));

        let writes = app.pixels.strip(0).unwrap().driver().writes;
        scheduler.clock().set(1);
        scheduler.dispatch(&mut app);
        assert_eq!(app.pixels.strip(0).unwrap().driver().writes, writes + 1);

        app.pixels
            .set_program_named(0, "off", PixelProgram::default(), &mut scheduler)
            .unwrap();
        assert!(scheduler.is_registered(RENDER_TASK_NAME));

        scheduler.clock().set(9_999);
        scheduler.dispatch(&mut app);
        assert!(scheduler.is_registered(RENDER_TASK_NAME));

        scheduler.clock().set(10_000);
        scheduler.dispatch(&mut app);
        assert!(!scheduler.is_registered(RENDER_TASK_NAME));
    }

    #[test]
    fn test_program_set_from_running_task() {
        fn button(app: &mut App, tasks: &mut dyn cooplight::TaskControl<App>) {
            let program = PixelProgram::new(PixelMode::Chase)
                .with_colors(&[0xFF_0000])
                .unwrap();
            app.pixels.set_program(1, &program, tasks).unwrap();
        }

        let (mut app, mut scheduler) = setup(4);
        scheduler
            .register("Button", RunState::ALL, 1000, button)
            .unwrap();
        app.pixels.install(&mut scheduler).unwrap();
        scheduler.set_run_state(RunState::INIT);

        scheduler.dispatch(&mut app);
        assert!(scheduler.is_registered(RENDER_TASK_NAME));
        assert!(app.pixels.strip(1).unwrap().pixels().iter().all(|pixel| *pixel == BLACK));

        scheduler.clock().set(1);
        scheduler.dispatch(&mut app);
        assert_eq!(app.pixels.strip(1).unwrap().pixels()[0], RED);
    }

    #[test]
    fn test_render_task_respects_run_state() {
        let (mut app, mut scheduler) = setup(4);
        app.pixels
            .set_program(0, &chase(&[0xFF_0000]), &mut scheduler)
            .unwrap();
        scheduler.set_run_state(RunState::AP);
        scheduler.dispatch(&mut app);
        assert_eq!(pixels(&app), [BLACK; 4]);

        scheduler.set_run_state(RunState::STA_DOWN);
        scheduler.dispatch(&mut app);
        assert_eq!(pixels(&app)[0], RED);
    }
}
