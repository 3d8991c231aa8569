//! Built-in artifact stubs.
//!
//! The emitted artifacts target a Laravel-style host application; each stub
//! declares its holes as `{{NAME}}` and is rendered through
//! [`super::template::Template`]. Holes that receive a multi-line block are
//! placed at the indentation the first block line should carry.

use super::template::Template;

pub const MODEL: Template = Template::new(
    "model",
    r##"<?php

namespace {{NAMESPACE}};

{{IMPORTS}}

{{PHP_DOC}}
class {{CLASS}} extends Model
{
    {{USE_SOFT_DELETES}}
    {{TABLE_PROPERTY}}
    {{PRIMARY_KEY_PROPERTY}}
    {{TIMESTAMPS_PROPERTY}}
    {{FILLABLE}}
{{RELATIONS}}
}
"##,
);

pub const MIGRATION: Template = Template::new(
    "migration",
    r##"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    /**
     * Run the migrations.
     */
    public function up(): void
    {
        Schema::create('{{TABLE}}', function (Blueprint $table) {
            {{COLUMNS}}
        });
    }

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {
        Schema::dropIfExists('{{TABLE}}');
    }
};
"##,
);

pub const ADMIN_CONTROLLER: Template = Template::new(
    "admin_controller",
    r##"<?php

namespace {{NAMESPACE}};

use {{MODEL_FQCN}};
use Encore\Admin\Controllers\AdminController;
use Encore\Admin\Form;
use Encore\Admin\Grid;
use Encore\Admin\Show;

class {{CLASS}} extends AdminController
{
    /**
     * Title for current resource.
     *
     * @var string
     */
    protected $title = '{{TITLE}}';

    /**
     * Make a grid builder.
     *
     * @return Grid
     */
    protected function grid()
    {
        $grid = new Grid(new {{MODEL}}());

        $grid->column('{{PRIMARY_KEY}}', '{{PRIMARY_KEY}}')->sortable();
        {{GRID_FIELDS}}

        return $grid;
    }

    /**
     * Make a show builder.
     *
     * @param mixed $id
     *
     * @return Show
     */
    protected function detail($id)
    {
        $show = new Show({{MODEL}}::findOrFail($id));

        $show->field('{{PRIMARY_KEY}}', '{{PRIMARY_KEY}}');
        {{SHOW_FIELDS}}

        return $show;
    }

    /**
     * Make a form builder.
     *
     * @return Form
     */
    protected function form()
    {
        $form = new Form(new {{MODEL}}());

        {{FORM_FIELDS}}

        return $form;
    }
}
"##,
);

pub const API_CONTROLLER: Template = Template::new(
    "api_controller",
    r##"<?php

namespace {{NAMESPACE}};

use App\Http\Controllers\Controller;
use App\Traits\ResponseMapper;
use {{MODEL_FQCN}};
use Illuminate\Http\Request;

class {{CLASS}} extends Controller
{
    use ResponseMapper;

    public function index(Request $request)
    {
        $items = {{MODEL}}::query()->paginate((int) $request->query('pageSize', 15));

        return $this->jsonResponse('List fetched', null, 200, [
            'items' => $items->items(),
            'pagination' => $this->setPagination($items),
        ]);
    }

    public function store(Request $request)
    {
        $data = $request->validate($this->storeRules());
        $model = {{MODEL}}::create($data);

        return $this->jsonResponse('Created', null, 201, $model->toArray());
    }

    public function show($id)
    {
        $model = {{MODEL}}::find($id);
        if (!$model) {
            return $this->notFound();
        }

        return $this->jsonResponse('Resource fetched', null, 200, $model->toArray());
    }

    public function update(Request $request, $id)
    {
        $model = {{MODEL}}::find($id);
        if (!$model) {
            return $this->notFound();
        }

        $data = $request->validate($this->updateRules());
        $model->fill($data)->save();

        return $this->jsonResponse('Updated', null, 200, $model->toArray());
    }

    public function destroy($id)
    {
        $model = {{MODEL}}::find($id);
        if (!$model) {
            return $this->notFound();
        }

        $model->delete();

        return $this->jsonResponse('Deleted', null, 200, []);
    }

    /**
     * Validation rules applied on store.
     */
    protected function storeRules(): array
    {
{{RULES_STORE}}
    }

    /**
     * Validation rules applied on update.
     */
    protected function updateRules(): array
    {
{{RULES_UPDATE}}
    }

    /**
     * Option-driven field metadata for API clients.
     */
    public function fieldMeta(): array
    {
        return [
{{FIELD_META}}
        ];
    }
}
"##,
);

/// Shared response-shaping trait; written once, never overwritten.
pub const RESPONSE_MAPPER: &str = r##"<?php

namespace App\Traits;

use Illuminate\Http\JsonResponse;

/**
 * Uniform JSON response shaping for generated API controllers.
 */
trait ResponseMapper
{
    /**
     * Pagination block for a paginator instance.
     */
    public function setPagination($data): array
    {
        return [
            'page' => $data->currentPage(),
            'pageSize' => $data->perPage(),
            'totalPage' => (int) ceil($data->total() / max(1, $data->perPage())),
            'totalRecords' => $data->total(),
        ];
    }

    public function jsonResponse($message = null, $error = null, $responseCode = null, $data = []): JsonResponse
    {
        $code = $responseCode ?: 200;

        return response()->json([
            'success' => in_array($code, [200, 201, 204], true),
            'message' => $message,
            'data' => $data,
            'error' => $error,
        ], $code);
    }

    protected function notFound(): JsonResponse
    {
        return $this->jsonResponse('Not found', ['resource' => 'Not found'], 404, []);
    }
}
"##;

pub const WEB_CONTROLLER: Template = Template::new(
    "web_controller",
    r##"<?php

namespace {{NAMESPACE}};

use App\Http\Controllers\Controller;
use {{MODEL_FQCN}};
use Illuminate\Http\Request;

class {{CLASS}} extends Controller
{
    public function index()
    {
        $rows = {{MODEL}}::query()->orderByDesc('{{PRIMARY_KEY}}')->paginate(15);

        return view('{{VIEW_DIR}}.index', ['rows' => $rows]);
    }

    public function create()
    {
        return view('{{VIEW_DIR}}.create', ['options' => $this->options()]);
    }

    public function store(Request $request)
    {
        $data = $request->validate($this->storeRules());
        $model = {{MODEL}}::create($this->withoutRelationKeys($data));

        {{SYNC_MANY_TO_MANY}}

        return redirect()->route('{{ROUTE_NAME}}.index')->with('status', 'Created');
    }

    public function show($id)
    {
        $model = {{MODEL}}::findOrFail($id);

        return view('{{VIEW_DIR}}.show', ['model' => $model]);
    }

    public function edit($id)
    {
        $model = {{MODEL}}::findOrFail($id);

        return view('{{VIEW_DIR}}.edit', ['model' => $model, 'options' => $this->options()]);
    }

    public function update(Request $request, $id)
    {
        $model = {{MODEL}}::findOrFail($id);
        $data = $request->validate($this->updateRules());
        $model->fill($this->withoutRelationKeys($data))->save();

        {{SYNC_MANY_TO_MANY}}

        return redirect()->route('{{ROUTE_NAME}}.index')->with('status', 'Updated');
    }

    public function destroy($id)
    {
        {{MODEL}}::findOrFail($id)->delete();

        return redirect()->route('{{ROUTE_NAME}}.index')->with('status', 'Deleted');
    }

    /**
     * Option maps consumed by the form partial.
     */
    protected function options(): array
    {
        return [
{{OPTIONS_BAG}}
        ];
    }

    protected function storeRules(): array
    {
{{RULES_STORE}}
    }

    protected function updateRules(): array
    {
{{RULES_UPDATE}}
    }

    /**
     * Strip many-to-many keys before mass assignment; they are synced
     * against the relation, not stored as columns.
     */
    protected function withoutRelationKeys(array $data): array
    {
        foreach ([{{MANY_TO_MANY_KEYS}}] as $key) {
            unset($data[$key]);
        }

        return $data;
    }
}
"##,
);

pub const BLADE_LAYOUT: Template = Template::new(
    "blade/_layout",
    r##"<!doctype html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{TITLE}}</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css" rel="stylesheet">
</head>
<body class="bg-light">
<div class="container py-4">
    @if (session('status'))
        <div class="alert alert-success">{{ session('status') }}</div>
    @endif

    @yield('content')
</div>
</body>
</html>
"##,
);

pub const BLADE_INDEX: Template = Template::new(
    "blade/index",
    r##"@extends('{{VIEW_DIR}}._layout')

@section('content')
    <div class="d-flex justify-content-between align-items-center mb-3">
        <h1 class="h3">{{TITLE}}</h1>
        <a href="{{ route('{{ROUTE_NAME}}.create') }}" class="btn btn-primary">New</a>
    </div>

    <table class="table table-striped bg-white">
        <thead>
        <tr>
            {{INDEX_HEAD}}
            <th class="text-end">Actions</th>
        </tr>
        </thead>
        <tbody>
        @foreach ($rows as $row)
            <tr>
                {{INDEX_COLS}}
                <td class="text-end">
                    <a href="{{ route('{{ROUTE_NAME}}.show', $row) }}" class="btn btn-sm btn-outline-secondary">View</a>
                    <a href="{{ route('{{ROUTE_NAME}}.edit', $row) }}" class="btn btn-sm btn-outline-primary">Edit</a>
                    <form action="{{ route('{{ROUTE_NAME}}.destroy', $row) }}" method="post" class="d-inline">
                        @csrf
                        @method('DELETE')
                        <button class="btn btn-sm btn-outline-danger" onclick="return confirm('Delete?')">Delete</button>
                    </form>
                </td>
            </tr>
        @endforeach
        </tbody>
    </table>

    {{ $rows->links() }}
@endsection
"##,
);

pub const BLADE_FORM: Template = Template::new(
    "blade/_form",
    r##"@if ($errors->any())
    <div class="alert alert-danger">
        <ul class="mb-0">
            @foreach ($errors->all() as $error)
                <li>{{ $error }}</li>
            @endforeach
        </ul>
    </div>
@endif

{{FORM_FIELDS}}
"##,
);

pub const BLADE_CREATE: Template = Template::new(
    "blade/create",
    r##"@extends('{{VIEW_DIR}}._layout')

@section('content')
    <h1 class="h3 mb-3">Create</h1>

    <form action="{{ route('{{ROUTE_NAME}}.store') }}" method="post">
        @csrf
        @include('{{VIEW_DIR}}._form')
        <button class="btn btn-primary">Save</button>
        <a href="{{ route('{{ROUTE_NAME}}.index') }}" class="btn btn-link">Cancel</a>
    </form>
@endsection
"##,
);

pub const BLADE_EDIT: Template = Template::new(
    "blade/edit",
    r##"@extends('{{VIEW_DIR}}._layout')

@section('content')
    <h1 class="h3 mb-3">Edit</h1>

    <form action="{{ route('{{ROUTE_NAME}}.update', $model) }}" method="post">
        @csrf
        @method('PUT')
        @include('{{VIEW_DIR}}._form')
        <button class="btn btn-primary">Save</button>
        <a href="{{ route('{{ROUTE_NAME}}.index') }}" class="btn btn-link">Cancel</a>
    </form>
@endsection
"##,
);

pub const BLADE_SHOW: Template = Template::new(
    "blade/show",
    r##"@extends('{{VIEW_DIR}}._layout')

@section('content')
    <h1 class="h3 mb-3">Details</h1>

    <table class="table bg-white">
        {{SHOW_ROWS}}
    </table>

    <a href="{{ route('{{ROUTE_NAME}}.index') }}" class="btn btn-link">Back</a>
@endsection
"##,
);

pub const TEST_API: Template = Template::new(
    "tests/api",
    r##"<?php

it('lists {{MODEL}} with the uniform response shape', function () {
    $res = $this->getJson('{{API_BASE}}');
    $res->assertOk()
        ->assertJsonStructure([
            'success', 'message',
            'data' => ['items', 'pagination' => ['page', 'pageSize', 'totalPage', 'totalRecords']],
            'error',
        ])
        ->assertJsonPath('success', true)
        ->assertJsonPath('message', 'List fetched');
});

it('creates, shows, updates and deletes {{MODEL}} with uniform JSON', function () {
    // Minimal payload first; strict-required scaffolds answer 422.
    $create = $this->postJson('{{API_BASE}}', []);
    if ($create->status() === 201) {
        $id = data_get($create->json(), 'data.id');
        expect($id)->toBeInt();
    } else {
        $create->assertStatus(422);
        // Fall back to a common string field before giving up.
        $create = $this->postJson('{{API_BASE}}', ['name' => 'Test']);
        if ($create->status() === 422) {
            $this->markTestSkipped('Scaffold requires more fields; generator kept test generic.');
        }
        $id = data_get($create->json(), 'data.id');
    }

    $this->getJson('{{API_BASE}}/' . $id)
        ->assertOk()
        ->assertJsonPath('success', true)
        ->assertJsonPath('message', 'Resource fetched')
        ->assertJsonPath('data.id', $id);

    $this->putJson('{{API_BASE}}/' . $id, ['remarks' => 'updated via test'])
        ->assertOk()
        ->assertJsonPath('success', true)
        ->assertJsonPath('message', 'Updated');

    $this->deleteJson('{{API_BASE}}/' . $id)
        ->assertOk()
        ->assertJsonPath('success', true)
        ->assertJsonPath('message', 'Deleted');

    $this->getJson('{{API_BASE}}/' . $id)
        ->assertStatus(404)
        ->assertJsonPath('success', false)
        ->assertJsonPath('message', 'Not found');
});
"##,
);

pub const TEST_WEB: Template = Template::new(
    "tests/web",
    r##"<?php

it('renders {{MODEL}} index and create pages and performs store/update/delete', function () {
    $this->get(route('{{ROUTE_NAME}}.index'))->assertOk();
    $this->get(route('{{ROUTE_NAME}}.create'))->assertOk();

    // Best-effort minimal payload, then a common fallback field.
    $store = $this->post(route('{{ROUTE_NAME}}.store'), []);
    if ($store->status() !== 302) {
        $store = $this->post(route('{{ROUTE_NAME}}.store'), ['name' => 'Test']);
        if ($store->status() !== 302) {
            $this->markTestSkipped('Scaffold requires additional fields; skipping strict assertions.');
            return;
        }
    }

    $id = \DB::table((new \{{MODEL_FQCN}}())->getTable())->max('id');

    $this->get(route('{{ROUTE_NAME}}.edit', $id))->assertOk();

    $this->put(route('{{ROUTE_NAME}}.update', $id), ['remarks' => 'updated'])
        ->assertStatus(302);

    $this->delete(route('{{ROUTE_NAME}}.destroy', $id))
        ->assertStatus(302);
});
"##,
);

pub const TEST_ADMIN: Template = Template::new(
    "tests/admin",
    r##"<?php

it('loads {{MODEL}} admin grid and can submit the create form', function () {
    loginAsAdmin();

    $this->get('{{ADMIN_BASE_URI}}')->assertOk();
    $this->get('{{ADMIN_BASE_URI}}/create')->assertOk();

    // May redirect back with validation errors; 200 and 302 are both fine.
    $res = $this->post('{{ADMIN_BASE_URI}}', ['name' => 'From Admin']);
    expect(in_array($res->status(), [200, 302], true))->toBeTrue();
});
"##,
);

pub const TEST_MODEL_UNIT: Template = Template::new(
    "tests/model_unit",
    r##"<?php

use {{MODEL_FQCN}};
use Illuminate\Database\Eloquent\SoftDeletes;

it('uses the expected table and fillable, and (if present) SoftDeletes', function () {
    $m = new {{MODEL}}();

    expect($m->getTable())->toBe('{{TABLE}}');
    foreach ([{{FILLABLE_LIST}}] as $f) {
        expect($m->getFillable())->toContain($f);
    }

    $traits = class_uses_recursive({{MODEL}}::class);
    if (in_array(SoftDeletes::class, array_keys($traits), true)) {
        expect($traits)->toHaveKey(SoftDeletes::class);
    } else {
        expect(true)->toBeTrue();
    }
});
"##,
);

pub const FACTORY: Template = Template::new(
    "factory",
    r##"<?php

namespace Database\Factories;

use {{MODEL_FQCN}};
use Illuminate\Database\Eloquent\Factories\Factory;

class {{MODEL}}Factory extends Factory
{
    protected $model = {{MODEL}}::class;

    public function definition(): array
    {
        return [
{{ASSIGNMENTS}}
        ];
    }
}
"##,
);

/// Pest bootstrap: written once per host application, never overwritten.
pub const PEST_BOOTSTRAP: &str = r##"<?php

use Illuminate\Foundation\Testing\RefreshDatabase;

uses(RefreshDatabase::class)->in('Feature', 'Unit');

/**
 * Log in on the admin guard and return the admin user.
 *
 * @param  array{username?:string,password?:string,name?:string,email?:string}  $attrs
 */
function loginAsAdmin(array $attrs = [])
{
    $userClass = config('admin.database.users_model')
        ?? \Encore\Admin\Auth\Database\Administrator::class;

    $guard = config('admin.auth.guard', 'admin');

    /** @var \Illuminate\Database\Eloquent\Model $u */
    $u = new $userClass();

    $u->username = $attrs['username'] ?? 'admin@test.local';
    $u->password = bcrypt($attrs['password'] ?? 'secret');
    $u->name = $attrs['name'] ?? 'Test Admin';

    if (\Illuminate\Support\Facades\Schema::hasColumn($u->getTable(), 'email')) {
        $u->email = $attrs['email'] ?? 'admin@test.local';
    }

    $u->save();

    $roleClass = config('admin.database.roles_model');
    if ($roleClass && method_exists($u, 'roles')) {
        $role = $roleClass::firstOrCreate(['slug' => 'admin'], ['name' => 'Admin']);
        $u->roles()->syncWithoutDetaching([$role->getKey()]);
    }

    test()->actingAs($u, $guard);

    return $u;
}
"##;
